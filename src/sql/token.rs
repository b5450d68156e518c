//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings. Most of what the series builders emit is
//! verbatim column arithmetic, carried as [`Token::Raw`]; keywords and
//! punctuation stay typed so statement shape is decided in one place.

use super::dialect::{Dialect, SqlDialect};

/// SQL Token - every element a statement is assembled from.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    With,
    Select,
    From,
    Where,
    As,
    Join,
    On,
    Offset,

    // === Punctuation ===
    Comma,
    LParen,
    RParen,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Identifier quoted by the dialect (output aliases, labels).
    Ident(String),
    /// Integer literal
    LitInt(i64),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// # Security Warning
    ///
    /// **Never pass user input to this variant.** Column expressions, table
    /// names and host placeholders are static text owned by the family
    /// catalogs; free-text labels go through [`Token::Ident`].
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::With => "WITH".into(),
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::As => "AS".into(),
            Token::Join => "JOIN".into(),
            Token::On => "ON".into(),
            Token::Offset => "OFFSET".into(),

            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Space => " ".into(),

            Token::Ident(name) => dialect.quote_identifier(name),
            Token::LitInt(n) => n.to_string(),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Append several streams with `sep` between consecutive ones.
    pub fn append_separated<'a>(
        &mut self,
        streams: impl IntoIterator<Item = &'a TokenStream>,
        sep: &[Token],
    ) -> &mut Self {
        for (i, ts) in streams.into_iter().enumerate() {
            if i > 0 {
                self.extend(sep.iter().cloned());
            }
            self.append(ts);
        }
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn raw(&mut self, sql: &str) -> &mut Self {
        self.push(Token::Raw(sql.into()))
    }
}
