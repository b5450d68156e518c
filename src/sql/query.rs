//! Query builder - construct SQL statements with a fluent API.
//!
//! A [`Query`] is a value: every builder step consumes it and returns the
//! updated statement, so call order is output order. The rendered shape is
//! fixed:
//!
//! ```text
//! WITH a AS (..), b AS (..) SELECT f1, f2 FROM src JOIN.. JOIN.. WHERE t1 t2 ..
//! ```

use super::dialect::Dialect;
use super::fragment::{Field, Fragment, Join, Render};
use super::token::{Token, TokenStream};

/// A SELECT statement, possibly carrying its own common table expressions.
///
/// WHERE tokens are free-form text rendered space-separated after `WHERE`;
/// they also carry trailing clauses such as `ORDER BY time`, so callers push
/// them in the order they should appear.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until rendered with render() or to_sql()"]
pub struct Query {
    /// Name under which a parent renders this query as a CTE.
    pub name: Option<String>,
    pub ctes: Vec<Query>,
    pub fields: Vec<Field>,
    pub source: Option<Fragment>,
    pub joins: Vec<Join>,
    pub wheres: Vec<String>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name used when this query is rendered as a CTE.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the CTE list.
    pub fn subqueries(mut self, ctes: Vec<Query>) -> Self {
        self.ctes = ctes;
        self
    }

    /// Append one CTE.
    pub fn subquery(mut self, cte: Query) -> Self {
        self.ctes.push(cte);
        self
    }

    /// Replace the SELECT list.
    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Append one SELECT item.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the FROM source.
    pub fn from(mut self, source: impl Into<Fragment>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Replace the JOIN list.
    pub fn joins(mut self, joins: Vec<Join>) -> Self {
        self.joins = joins;
        self
    }

    /// Append joins.
    pub fn join_all(mut self, joins: impl IntoIterator<Item = Join>) -> Self {
        self.joins.extend(joins);
        self
    }

    /// Replace the WHERE token list.
    pub fn wheres(mut self, tokens: Vec<String>) -> Self {
        self.wheres = tokens;
        self
    }

    /// Append one WHERE token.
    pub fn where_token(mut self, token: impl Into<String>) -> Self {
        self.wheres.push(token.into());
        self
    }

    fn cte_tokens(cte: &Query) -> TokenStream {
        let Some(name) = cte.name.as_deref() else {
            panic!(
                "common table expression has no name: {}",
                cte.render()
            );
        };

        let mut ts = TokenStream::new();
        ts.raw(name)
            .space()
            .push(Token::As)
            .space()
            .lparen()
            .append(&cte.to_tokens())
            .rparen();
        ts
    }

    /// Generate SQL string for a specific dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        Render::to_sql(self, dialect)
    }

    /// Generate SQL string for the default dialect.
    pub fn render(&self) -> String {
        Render::render(self)
    }
}

impl Render for Query {
    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        // WITH clause
        if !self.ctes.is_empty() {
            let ctes: Vec<TokenStream> = self.ctes.iter().map(Self::cte_tokens).collect();
            ts.push(Token::With).space();
            ts.append_separated(&ctes, &[Token::Comma, Token::Space]);
            ts.space();
        }

        // SELECT
        let fields: Vec<TokenStream> = self.fields.iter().map(Render::to_tokens).collect();
        ts.push(Token::Select).space();
        ts.append_separated(&fields, &[Token::Comma, Token::Space]);

        // FROM
        if let Some(source) = &self.source {
            ts.space().push(Token::From).space();
            ts.append(&source.to_tokens());
        }

        // JOINs
        for join in &self.joins {
            ts.space().append(&join.to_tokens());
        }

        // WHERE
        if !self.wheres.is_empty() {
            ts.space().push(Token::Where);
            for token in &self.wheres {
                ts.space().raw(token);
            }
        }

        ts
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

// =============================================================================
// Tests
// =============================================================================
