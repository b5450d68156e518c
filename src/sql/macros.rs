//! Expansion of the dashboard host's time placeholders.
//!
//! Generated SQL refers to the selected time range only through
//! `$__timeFilter(col)`, `$__timeFrom()` and `$__timeTo()`; the dashboard
//! host substitutes them at execution time. [`expand`] performs the same
//! substitution so a query can be run directly against the database.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;

use super::dialect::{Dialect, SqlDialect};

static TIME_FILTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$__timeFilter\(\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\)").unwrap());

static TIME_FROM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$__timeFrom\(\s*\)").unwrap());

static TIME_TO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$__timeTo\(\s*\)").unwrap());

/// Error type for placeholder expansion.
#[derive(Debug, thiserror::Error)]
pub enum MacroError {
    #[error("Invalid RFC 3339 timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Empty time range: {from} is not before {to}")]
    EmptyRange { from: String, to: String },
}

/// A concrete dashboard time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

impl TimeRange {
    /// Parse both ends from RFC 3339 text.
    pub fn parse(from: &str, to: &str) -> Result<Self, MacroError> {
        let from = parse_timestamp(from)?;
        let to = parse_timestamp(to)?;
        if from >= to {
            return Err(MacroError::EmptyRange {
                from: from.to_rfc3339(),
                to: to.to_rfc3339(),
            });
        }
        Ok(Self { from, to })
    }

    fn literal(ts: &DateTime<FixedOffset>) -> String {
        Dialect::default().quote_string(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn from_literal(&self) -> String {
        Self::literal(&self.from)
    }

    pub fn to_literal(&self) -> String {
        Self::literal(&self.to)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, MacroError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|source| MacroError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

/// Substitute every host time placeholder in `sql` with literals from `range`.
///
/// Substitution is textual and reaches into quoted identifiers too; labels
/// that end up as aliases must not carry `$__`.
pub fn expand(sql: &str, range: &TimeRange) -> String {
    let from = range.from_literal();
    let to = range.to_literal();

    let sql = TIME_FILTER.replace_all(sql, |caps: &regex::Captures<'_>| {
        format!("{} BETWEEN {} AND {}", &caps[1], from, to)
    });
    let sql = TIME_FROM.replace_all(&sql, regex::NoExpand(&from));
    let sql = TIME_TO.replace_all(&sql, regex::NoExpand(&to));
    sql.into_owned()
}
