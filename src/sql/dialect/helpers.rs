//! Shared helper functions for SQL dialect implementations.

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
