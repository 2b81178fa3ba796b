//! Expression encoding
//!
//! Converts a single token into an embeddable script fragment. Two
//! contexts exist: inside a string literal (interpolation syntax) or
//! standalone. Expressions are opaque text; encoding wraps them in the
//! host's string conversion, it never interprets them.

use super::engine::CompileError;
use super::token::{Token, TokenKind};

/// Encode a token as a script fragment.
///
/// - expressions (bare or bracketed) become `(expr).toString()`, wrapped
///   in `${…}` when embedded in a string literal
/// - quoted strings lose their quotes when embedded, keep them standalone
/// - bare strings and text embed verbatim, or gain quotes standalone
pub fn expression_code(token: &Token, in_string: bool) -> Result<String, CompileError> {
    match token.kind {
        TokenKind::Expression => {
            let conversion = format!("({}).toString()", token.content);
            Ok(embed(conversion, in_string))
        }
        TokenKind::BracketExpression => {
            let inner = &token.content[1..token.content.len() - 1];
            let conversion = format!("({inner}).toString()");
            Ok(embed(conversion, in_string))
        }
        TokenKind::QuotedString => {
            if in_string {
                Ok(token.content[1..token.content.len() - 1].to_string())
            } else {
                Ok(token.content.clone())
            }
        }
        TokenKind::String | TokenKind::Text => {
            if in_string {
                Ok(token.content.clone())
            } else {
                Ok(format!("\"{}\"", token.content))
            }
        }
        _ => Err(CompileError::ExpectedOther {
            found: token.clone(),
            expected: vec![
                TokenKind::BracketExpression,
                TokenKind::QuotedString,
                TokenKind::Expression,
                TokenKind::String,
            ],
        }),
    }
}

fn embed(conversion: String, in_string: bool) -> String {
    if in_string {
        format!("${{{conversion}}}")
    } else {
        conversion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, content: &str) -> Token {
        Token::new(kind, content, 1, 1, 0)
    }

    #[test]
    fn test_expression() {
        let t = token(TokenKind::Expression, "user.name");
        assert_eq!(
            expression_code(&t, false).unwrap(),
            "(user.name).toString()"
        );
        assert_eq!(
            expression_code(&t, true).unwrap(),
            "${(user.name).toString()}"
        );
    }

    #[test]
    fn test_bracket_expression_strips_braces() {
        let t = token(TokenKind::BracketExpression, "{user.name}");
        assert_eq!(
            expression_code(&t, false).unwrap(),
            "(user.name).toString()"
        );
        assert_eq!(
            expression_code(&t, true).unwrap(),
            "${(user.name).toString()}"
        );
    }

    #[test]
    fn test_quoted_string() {
        let t = token(TokenKind::QuotedString, "\"hello\"");
        assert_eq!(expression_code(&t, true).unwrap(), "hello");
        assert_eq!(expression_code(&t, false).unwrap(), "\"hello\"");
    }

    #[test]
    fn test_bare_string_and_text() {
        let s = token(TokenKind::String, "div");
        assert_eq!(expression_code(&s, true).unwrap(), "div");
        assert_eq!(expression_code(&s, false).unwrap(), "\"div\"");

        let t = token(TokenKind::Text, "plain");
        assert_eq!(expression_code(&t, true).unwrap(), "plain");
        assert_eq!(expression_code(&t, false).unwrap(), "\"plain\"");
    }

    #[test]
    fn test_rejects_other_kinds() {
        let t = token(TokenKind::WhiteSpace, "  ");
        let error = expression_code(&t, true).unwrap_err();
        match error {
            CompileError::ExpectedOther { found, expected } => {
                assert_eq!(found.kind, TokenKind::WhiteSpace);
                assert_eq!(expected.len(), 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
