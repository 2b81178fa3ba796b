//! Token serialization formats
//!
//! Renditions of the token stream for inspection and tooling: a simple
//! line-per-token text format and pretty-printed JSON. The CLI selects a
//! format by name; unknown names are reported, not defaulted.

use std::fmt;

use super::token::Token;

/// Available token stream formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Simple,
    Json,
}

/// Errors that can occur when serializing tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Unknown format name
    InvalidFormat(String),
    /// Serialization failure
    Serialization(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidFormat(name) => {
                write!(f, "Format error: unknown format `{name}` (expected 'simple' or 'json')")
            }
            FormatError::Serialization(message) => {
                write!(f, "Format error: {message}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

impl TokenFormat {
    /// Parse a format name like "simple" or "json"
    pub fn from_string(name: &str) -> Result<Self, FormatError> {
        match name {
            "simple" => Ok(TokenFormat::Simple),
            "json" => Ok(TokenFormat::Json),
            _ => Err(FormatError::InvalidFormat(name.to_string())),
        }
    }

    /// Serialize a token stream in this format
    pub fn serialize(&self, tokens: &[Token]) -> Result<String, FormatError> {
        match self {
            TokenFormat::Simple => Ok(tokens_to_simple(tokens)),
            TokenFormat::Json => serde_json::to_string_pretty(tokens)
                .map_err(|error| FormatError::Serialization(error.to_string())),
        }
    }
}

/// One token per line: `LINE:COLUMN KIND content`.
pub fn tokens_to_simple(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| {
            format!(
                "{}:{} {:?} {:?}",
                token.line, token.column, token.kind, token.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lamina::token::TokenKind;

    #[test]
    fn test_from_string() {
        assert_eq!(TokenFormat::from_string("simple"), Ok(TokenFormat::Simple));
        assert_eq!(TokenFormat::from_string("json"), Ok(TokenFormat::Json));
        assert_eq!(
            TokenFormat::from_string("xml"),
            Err(FormatError::InvalidFormat("xml".to_string()))
        );
    }

    #[test]
    fn test_simple_format() {
        let tokens = vec![
            Token::new(TokenKind::ElementIdentifier, "%", 1, 1, 0),
            Token::new(TokenKind::String, "p", 1, 2, 1),
        ];
        assert_eq!(
            tokens_to_simple(&tokens),
            "1:1 ElementIdentifier \"%\"\n1:2 String \"p\""
        );
    }

    #[test]
    fn test_json_format_round_trips_kind_names() {
        let tokens = vec![Token::new(TokenKind::Text, "hi", 1, 1, 0)];
        let json = TokenFormat::Json.serialize(&tokens).unwrap();
        assert!(json.contains("\"kind\": \"Text\""));
        assert!(json.contains("\"content\": \"hi\""));
    }
}
