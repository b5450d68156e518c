//! SQL generation module.
//!
//! Text-level building blocks for the dashboard queries:
//!
//! - [`fragment`] - literal fragments, aliased fields, joins
//! - [`query`] - the composite `WITH .. SELECT .. FROM .. JOIN .. WHERE ..` statement
//! - [`timeseries`] - time filter / ordering tokens and full-outer time joins
//! - [`macros`] - expansion of the host's time-range placeholders
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod fragment;
pub mod macros;
pub mod query;
pub mod timeseries;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use fragment::{quote_alias, Field, Fragment, Join, Render, FULL_OUTER, LEFT_OUTER};
pub use macros::{expand, MacroError, TimeRange};
pub use query::Query;
pub use timeseries::{time_join, Timeseries, TIME_FILTER, TIME_FROM, TIME_TO};
pub use token::{Token, TokenStream};
