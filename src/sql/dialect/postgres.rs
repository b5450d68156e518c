//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features relied on by the dashboard queries:
//! - ANSI identifier quoting (`"`), so dotted aliases like `"solar1.power_w"`
//!   survive as single column names
//! - FULL OUTER JOIN
//! - GENERATE_SERIES / DATE_TRUNC / INTERVAL arithmetic
//! - `OFFSET 0` as an optimizer fence on subqueries

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }
}
