//! Shared helpers for integration tests.

use kilowatt::sql::{expand, TimeRange};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Resolve host placeholders against a fixed month and parse as PostgreSQL.
pub fn validate_sql(sql: &str) -> Result<(), String> {
    let range = TimeRange::parse("2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z")
        .map_err(|e| e.to_string())?;
    let expanded = expand(sql, &range);
    Parser::parse_sql(&PostgreSqlDialect {}, &expanded)
        .map(|_| ())
        .map_err(|e| format!("{e}\nSQL: {expanded}"))
}
