//! Core token definitions for the lamina format
//!
//! This module defines the raw character-class tokens produced by the
//! logos lexer. The core pass is context-free; everything that depends on
//! position within a line (tag values, attribute pairs, rest-of-line
//! expressions) is resolved by the line assembly transformation.
//!
//! Carriage returns are skipped so CRLF sources lex like LF sources.

use logos::Logos;

/// All possible raw tokens in the lamina format
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"\r")]
pub enum CoreToken {
    // Construct markers
    #[token("!!!")]
    DocTypeMarker,
    #[token("!")]
    Bang,
    #[token("%")]
    Percent,
    #[token("#")]
    Hash,
    #[token(".")]
    Dot,
    #[token("/")]
    Slash,
    #[token("-")]
    Dash,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,

    // An unpaired double quote falls back to plain content
    #[token("\"")]
    Quote,

    // Single-line balanced expressions and strings
    #[regex(r"\{[^{}\n]*\}")]
    BraceExpression,
    #[regex(r#""[^"\n]*""#)]
    QuotedString,

    // Whitespace (excluding newlines)
    #[regex(r"[ \t]+")]
    Whitespace,

    // Line breaks
    #[token("\n")]
    Newline,

    // Content runs (catch-all for non-special characters)
    #[regex(r#"[^ \t\r\n!%#./=:{}"-]+"#)]
    Word,
}

impl CoreToken {
    /// Check if this token is whitespace (including newlines)
    pub fn is_whitespace(&self) -> bool {
        matches!(self, CoreToken::Whitespace | CoreToken::Newline)
    }

    /// Check if this token can extend a bare word run (tag names,
    /// attribute names and the like)
    pub fn is_word_part(&self) -> bool {
        matches!(self, CoreToken::Word | CoreToken::Dash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<CoreToken> {
        CoreToken::lexer(source)
            .filter_map(|result| result.ok())
            .collect()
    }

    #[test]
    fn test_markers() {
        assert_eq!(
            kinds("% # . / - = :"),
            vec![
                CoreToken::Percent,
                CoreToken::Whitespace,
                CoreToken::Hash,
                CoreToken::Whitespace,
                CoreToken::Dot,
                CoreToken::Whitespace,
                CoreToken::Slash,
                CoreToken::Whitespace,
                CoreToken::Dash,
                CoreToken::Whitespace,
                CoreToken::Equals,
                CoreToken::Whitespace,
                CoreToken::Colon,
            ]
        );
    }

    #[test]
    fn test_doctype_marker_beats_bang() {
        assert_eq!(kinds("!!!"), vec![CoreToken::DocTypeMarker]);
        assert_eq!(kinds("!!"), vec![CoreToken::Bang, CoreToken::Bang]);
        assert_eq!(kinds("wow!"), vec![CoreToken::Word, CoreToken::Bang]);
    }

    #[test]
    fn test_brace_expression() {
        assert_eq!(kinds("{user.name}"), vec![CoreToken::BraceExpression]);
    }

    #[test]
    fn test_quoted_string_beats_quote() {
        assert_eq!(kinds("\"hi\""), vec![CoreToken::QuotedString]);
        assert_eq!(kinds("\"\""), vec![CoreToken::QuotedString]);
        assert_eq!(
            kinds("say\"it"),
            vec![CoreToken::Word, CoreToken::Quote, CoreToken::Word]
        );
    }

    #[test]
    fn test_word_breaks_on_markers() {
        assert_eq!(
            kinds("data-target"),
            vec![CoreToken::Word, CoreToken::Dash, CoreToken::Word]
        );
        assert_eq!(
            kinds("a.b"),
            vec![CoreToken::Word, CoreToken::Dot, CoreToken::Word]
        );
    }

    #[test]
    fn test_stray_brace_is_an_error() {
        let results: Vec<_> = CoreToken::lexer("a }").collect();
        assert_eq!(results[0], Ok(CoreToken::Word));
        assert_eq!(results[1], Ok(CoreToken::Whitespace));
        assert!(results[2].is_err());
    }

    #[test]
    fn test_carriage_return_is_skipped() {
        assert_eq!(
            kinds("a\r\nb"),
            vec![CoreToken::Word, CoreToken::Newline, CoreToken::Word]
        );
    }
}
