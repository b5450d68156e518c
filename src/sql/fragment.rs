//! Leaf text primitives: fragments, fields and joins.
//!
//! Everything here renders verbatim. Expressions are static column
//! arithmetic owned by the family catalogs, so no escaping is applied to
//! them; only aliases built from names go through [`quote_alias`].

use super::dialect::Dialect;
use super::token::{Token, TokenStream};

/// Anything that renders to SQL text.
pub trait Render {
    /// Convert to a token stream.
    fn to_tokens(&self) -> TokenStream;

    /// Generate SQL text for a specific dialect.
    fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    /// Generate SQL text for the default (PostgreSQL) dialect.
    fn render(&self) -> String {
        self.to_sql(Dialect::default())
    }
}

/// Quote a name for use as an output alias, e.g. `solar1.power_w` becomes
/// `"solar1.power_w"`.
pub fn quote_alias(name: &str) -> String {
    Token::Ident(name.into()).serialize(Dialect::default())
}

// =============================================================================
// Fragment
// =============================================================================

/// A literal SQL expression, rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Render for Fragment {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw(&self.text);
        ts
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::new(text)
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::new(text)
    }
}

// =============================================================================
// Field
// =============================================================================

/// A SELECT list item: expression plus output alias.
///
/// An absent alias makes the field self-aliased, and a self-aliased field
/// renders as the bare expression. Physical column names are reused verbatim
/// as aliases, so `top AS top` never appears in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "builders have no effect until used"]
pub struct Field {
    pub expr: String,
    pub alias: String,
}

impl Field {
    pub fn new(expr: impl Into<String>, alias: Option<&str>) -> Self {
        let expr = expr.into();
        let alias = alias.map(String::from).unwrap_or_else(|| expr.clone());
        Self { expr, alias }
    }

    /// A field whose alias equals its expression.
    pub fn bare(expr: impl Into<String>) -> Self {
        Self::new(expr, None)
    }

    /// Same expression under `alias`, or an unchanged copy when `alias` is `None`.
    pub fn with_alias(&self, alias: Option<&str>) -> Self {
        match alias {
            Some(alias) => Self {
                expr: self.expr.clone(),
                alias: alias.into(),
            },
            None => self.clone(),
        }
    }

    pub fn is_self_aliased(&self) -> bool {
        self.expr == self.alias
    }
}

impl Render for Field {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw(&self.expr);
        if !self.is_self_aliased() {
            ts.space().push(Token::As).space().raw(&self.alias);
        }
        ts
    }
}

// =============================================================================
// Join
// =============================================================================

/// Join kind used to align independently sampled sources on time.
pub const FULL_OUTER: &str = "FULL OUTER";

/// Join kind used to look up a series at generated bucket instants.
pub const LEFT_OUTER: &str = "LEFT OUTER";

/// A JOIN clause. The kind is free text; callers only pass kinds the
/// target dialect understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: String,
    pub target: String,
    pub condition: String,
}

impl Join {
    pub fn new(
        kind: impl Into<String>,
        target: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
            condition: condition.into(),
        }
    }

    pub fn full_outer(target: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::new(FULL_OUTER, target, condition)
    }

    pub fn left_outer(target: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::new(LEFT_OUTER, target, condition)
    }
}

impl Render for Join {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw(&self.kind)
            .space()
            .push(Token::Join)
            .space()
            .raw(&self.target)
            .space()
            .push(Token::On)
            .space()
            .raw(&self.condition);
        ts
    }
}
