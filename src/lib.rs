//! # Kilowatt
//!
//! Composable, time-aligned SQL for energy-monitoring dashboards.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Panels (targets + refIds)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  Aggregators (production, consumption, heating)          │
//! │  Samples (calendar buckets)                              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  Proxies (per-device columns, combined sums/averages)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  Series (per-family field catalogs, one device each)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  SQL primitives (Fragment, Field, Join, Query, tokens)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query factory returns a [`sql::Query`]; `render()` yields PostgreSQL
//! text carrying the host's `$__timeFilter(time)`, `$__timeFrom()` and
//! `$__timeTo()` placeholders.

pub mod aggregate;
pub mod config;
pub mod panel;
pub mod proxy;
pub mod samples;
pub mod series;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::{Combination, Consumption, Heating, Production, Sign, Source};
    pub use crate::config::{Devices, Settings, SettingsError};
    pub use crate::panel::{targets, Format, PanelKind, Target};
    pub use crate::proxy::{AggregateProxy, ProxyField, ProxyQuery, TimeProxy, TimeseriesProxy};
    pub use crate::samples::{Samples, TruncUnit};
    pub use crate::series::{
        Battery, BidirMeter, Boiler, Family, Generator, Heatpump, Meter, Quantity, Series,
        SimpleMeter, Solar, Wallbox, Weather,
    };
    pub use crate::sql::{
        expand, Dialect, Field, Fragment, Join, Query, Render, SqlDialect, TimeRange, Timeseries,
    };
}
