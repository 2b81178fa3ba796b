//! Lexer
//!
//! This module orchestrates the complete tokenization pipeline for the
//! lamina format.
//!
//! The pipeline consists of:
//! 1. Core tokenization using the logos lexer (./tokens_core.rs,
//!    ./base_tokenization.rs): raw character-class tokens with byte spans.
//! 2. Line assembly (./assemble.rs): raw tokens are grouped into source
//!    lines and assembled into the semantic tokens the compile engine
//!    consumes, with 1-based line/column positions and byte offsets.
//!
//! Indentation Handling
//!
//!     The raw pass keeps indentation as plain whitespace runs; the
//!     assembly pass turns a leading run into a whitespace token whose
//!     content length is the nesting depth. Non-blank lines without
//!     indentation still get a zero-length whitespace token (except the
//!     very first emitted line) so the engine's dedent flushing sees every
//!     depth transition. Blank lines produce no tokens at all.

pub mod assemble;
pub mod base_tokenization;
pub mod tokens_core;

pub use tokens_core::CoreToken;

use crate::lamina::token::Token;
use std::fmt;

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character that cannot start any token. In practice this is a
    /// stray `{` or `}` outside a balanced single-line brace expression.
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter {
                character,
                line,
                column,
            } => write!(
                f,
                "Lexing error: unexpected character `{}` at line {}, column {}",
                character, line, column
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize lamina source into the semantic token stream.
///
/// This is the entry point the compiler facade uses; it runs both lexing
/// passes and returns the tokens the engine consumes.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let core = base_tokenization::tokenize(source)?;
    Ok(assemble::assemble(source, &core))
}

/// 1-based line and column of a byte offset, used for error positions.
pub(crate) fn position_of(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lamina::testing::factories::mk_tokens;
    use crate::lamina::token::TokenKind::*;

    #[test]
    fn test_tag_line() {
        let tokens = lex("%p").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[(ElementIdentifier, "%", 1, 1, 0), (String, "p", 1, 2, 1)])
        );
    }

    #[test]
    fn test_nested_tags() {
        let tokens = lex("%ul\n  %li\nbye").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (ElementIdentifier, "%", 1, 1, 0),
                (String, "ul", 1, 2, 1),
                (WhiteSpace, "  ", 2, 1, 4),
                (ElementIdentifier, "%", 2, 3, 6),
                (String, "li", 2, 4, 7),
                (WhiteSpace, "", 3, 1, 10),
                (Text, "bye", 3, 1, 10),
            ])
        );
    }

    #[test]
    fn test_blank_lines_produce_no_tokens() {
        let tokens = lex("%p\n\n   \n%p").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (ElementIdentifier, "%", 1, 1, 0),
                (String, "p", 1, 2, 1),
                (WhiteSpace, "", 4, 1, 8),
                (ElementIdentifier, "%", 4, 1, 8),
                (String, "p", 4, 2, 9),
            ])
        );
    }

    #[test]
    fn test_id_and_class_line() {
        let tokens = lex("%span#x.y").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (ElementIdentifier, "%", 1, 1, 0),
                (String, "span", 1, 2, 1),
                (ElementIdIdentifier, "#", 1, 6, 5),
                (String, "x", 1, 7, 6),
                (ElementClassIdentifier, ".", 1, 8, 7),
                (String, "y", 1, 9, 8),
            ])
        );
    }

    #[test]
    fn test_attributes() {
        let tokens = lex("%a href=\"/home\" target={page.target}").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (ElementIdentifier, "%", 1, 1, 0),
                (String, "a", 1, 2, 1),
                (String, "href", 1, 4, 3),
                (AttributeConnector, "=", 1, 8, 7),
                (QuotedString, "\"/home\"", 1, 9, 8),
                (String, "target", 1, 17, 16),
                (AttributeConnector, "=", 1, 23, 22),
                (BracketExpression, "{page.target}", 1, 24, 23),
            ])
        );
    }

    #[test]
    fn test_inline_code_after_tag() {
        let tokens = lex("%p= user.name").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (ElementIdentifier, "%", 1, 1, 0),
                (String, "p", 1, 2, 1),
                (CodeIdentifier, "=", 1, 3, 2),
                (Expression, "user.name", 1, 5, 4),
            ])
        );
    }

    #[test]
    fn test_inline_text_after_tag() {
        let tokens = lex("%p Hello world").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (ElementIdentifier, "%", 1, 1, 0),
                (String, "p", 1, 2, 1),
                (Text, "Hello world", 1, 4, 3),
            ])
        );
    }

    #[test]
    fn test_code_line() {
        let tokens = lex("= items.size").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (CodeIdentifier, "=", 1, 1, 0),
                (Expression, "items.size", 1, 3, 2),
            ])
        );
    }

    #[test]
    fn test_silent_code_line() {
        let tokens = lex("- items.forEach").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (SilentCodeIdentifier, "-", 1, 1, 0),
                (Expression, "items.forEach", 1, 3, 2),
            ])
        );
    }

    #[test]
    fn test_comment_line() {
        let tokens = lex("/ a comment").unwrap();
        assert_eq!(tokens, mk_tokens(&[(Comment, "a comment", 1, 3, 2)]));
    }

    #[test]
    fn test_filter_line() {
        let tokens = lex(":uppercase").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (FilterIdentifier, ":", 1, 1, 0),
                (String, "uppercase", 1, 2, 1),
            ])
        );
    }

    #[test]
    fn test_doctype_line() {
        let tokens = lex("!!! 5\n%html").unwrap();
        assert_eq!(
            tokens,
            mk_tokens(&[
                (DocTypeIdentifier, "!!!", 1, 1, 0),
                (DocType, "5", 1, 5, 4),
                (WhiteSpace, "", 2, 1, 6),
                (ElementIdentifier, "%", 2, 1, 6),
                (String, "html", 2, 2, 7),
            ])
        );
    }

    #[test]
    fn test_bare_doctype_line() {
        let tokens = lex("!!!").unwrap();
        assert_eq!(tokens, mk_tokens(&[(DocTypeIdentifier, "!!!", 1, 1, 0)]));
    }

    #[test]
    fn test_text_keeps_interpolation() {
        let tokens = lex("Hello ${name}!").unwrap();
        assert_eq!(tokens, mk_tokens(&[(Text, "Hello ${name}!", 1, 1, 0)]));
    }

    #[test]
    fn test_stray_brace_is_rejected() {
        assert_eq!(
            lex("oops {"),
            Err(LexError::UnexpectedCharacter {
                character: '{',
                line: 1,
                column: 6,
            })
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lex(""), Ok(vec![]));
    }

    #[test]
    fn test_position_of() {
        let source = "ab\ncd";
        assert_eq!(position_of(source, 0), (1, 1));
        assert_eq!(position_of(source, 4), (2, 2));
    }
}
