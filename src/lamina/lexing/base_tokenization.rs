//! Base tokenization implementation for the lamina lexer
//!
//! This module provides the raw tokenization using the logos lexer
//! library. This is the entry point where source strings become core token
//! streams.
//!
//! The line assembly transformation operates on the token stream produced
//! by this function; it should not be called from anywhere else.

use super::tokens_core::CoreToken;
use super::{position_of, LexError};

/// Tokenize source code with location information
///
/// Returns core tokens paired with their byte spans. A character that
/// matches no pattern (a stray `{` or `}`) aborts tokenization with a
/// [`LexError::UnexpectedCharacter`] carrying its position.
pub fn tokenize(source: &str) -> Result<Vec<(CoreToken, logos::Span)>, LexError> {
    let mut lexer = logos::Lexer::<CoreToken>::new(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let span = lexer.span();
                let (line, column) = position_of(source, span.start);
                let character = source[span.start..].chars().next().unwrap_or('\u{fffd}');
                return Err(LexError::UnexpectedCharacter {
                    character,
                    line,
                    column,
                });
            }
        }
    }

    Ok(tokens)
}
