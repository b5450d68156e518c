//! Test utilities for SQL emission validation.
//!
//! Provides helpers for validating that emitted SQL is syntactically correct
//! using sqlparser-rs. Host placeholders are expanded first, the way the
//! dashboard host would before execution.

use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use super::macros::{expand, TimeRange};

/// Validates that a generated SQL string parses as PostgreSQL.
///
/// # Example
///
/// ```ignore
/// use crate::sql::test_utils::validate_sql;
///
/// validate_sql("SELECT time FROM solar WHERE series_id = 1 AND $__timeFilter(time)").unwrap();
/// ```
pub fn validate_sql(sql: &str) -> Result<(), String> {
    let range = TimeRange::parse("2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z")
        .map_err(|e| e.to_string())?;
    let expanded = expand(sql, &range);

    Parser::parse_sql(&PostgreSqlDialect {}, &expanded)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL: {}\nSQL: {}", e, expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT time, power_w FROM solar WHERE series_id = 1 AND $__timeFilter(time) ORDER BY time")
            .unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC time FORM solar");
        assert!(result.is_err());
    }
}
