//! SQL Dialect definitions and formatting rules.
//!
//! Dashboard queries target a PostgreSQL-flavoured datasource: double-quoted
//! identifiers, `FULL OUTER JOIN`, `GENERATE_SERIES`, `DATE_TRUNC` and
//! interval arithmetic. The trait keeps quoting out of the builders so the
//! token stream stays dialect-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use kilowatt::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("solar1.power_w");  // "solar1.power_w"
//! ```

pub mod helpers;
mod postgres;

pub use postgres::Postgres;

/// SQL dialect trait - defines how SQL constructs are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Quote an identifier (output alias, label).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All supported dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Postgres,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &Postgres,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_postgres() {
        assert_eq!(Dialect::default(), Dialect::Postgres);
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(
            Dialect::Postgres.quote_identifier("boiler1.top"),
            "\"boiler1.top\""
        );
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(Dialect::Postgres.quote_string("month"), "'month'");
        assert_eq!(Dialect::Postgres.quote_string("it's"), "'it''s'");
    }
}
