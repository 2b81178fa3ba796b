//! Testing utilities
//!
//! Two tools used throughout the test suite:
//!
//! 1. **Factories**: compact builders for expected token vectors, so
//!    lexer tests can assert exact token sequences without drowning in
//!    constructor noise.
//! 2. **[`MapEvaluator`]**: a map-backed [`ExpressionEvaluator`] for
//!    exercising the renderer. Expressions resolve by exact lookup; block
//!    expressions iterate over a comma-separated value with `it` bound to
//!    the current element, which is enough to drive every block shape the
//!    engine emits.

use std::collections::HashMap;

use super::render::{ExpressionEvaluator, RenderError};

/// Token factories for tests.
pub mod factories {
    use crate::lamina::token::{Token, TokenKind};

    /// Build a token vector from (kind, content, line, column, offset).
    pub fn mk_tokens(specs: &[(TokenKind, &str, usize, usize, usize)]) -> Vec<Token> {
        specs
            .iter()
            .map(|(kind, content, line, column, offset)| {
                Token::new(*kind, *content, *line, *column, *offset)
            })
            .collect()
    }

    /// A token with a placeholder position, for engine-level tests where
    /// positions do not matter.
    pub fn tok(kind: TokenKind, content: &str) -> Token {
        Token::new(kind, content, 1, 1, 0)
    }

    /// A whitespace token with a placeholder position.
    pub fn ws(content: &str) -> Token {
        tok(TokenKind::WhiteSpace, content)
    }
}

/// Expression evaluator backed by a map of expression texts to values.
///
/// `evaluate` is an exact lookup. `evaluate_block` splits the looked-up
/// value on commas, invokes the body once per element with `it` bound to
/// it, and converts the block call to the raw value.
#[derive(Debug, Default, Clone)]
pub struct MapEvaluator {
    values: HashMap<String, String>,
}

impl MapEvaluator {
    pub fn new() -> Self {
        MapEvaluator::default()
    }

    pub fn with(mut self, expression: &str, value: &str) -> Self {
        self.insert(expression, value);
        self
    }

    pub fn insert(&mut self, expression: &str, value: &str) {
        self.values
            .insert(expression.to_string(), value.to_string());
    }
}

impl ExpressionEvaluator for MapEvaluator {
    fn evaluate(&mut self, expression: &str) -> Result<String, RenderError> {
        self.values
            .get(expression)
            .cloned()
            .ok_or_else(|| RenderError::evaluation(expression, "unknown expression"))
    }

    fn evaluate_block(
        &mut self,
        expression: &str,
        body: &mut dyn FnMut(&mut dyn ExpressionEvaluator) -> Result<(), RenderError>,
    ) -> Result<String, RenderError> {
        let value = self.evaluate(expression)?;
        let items: Vec<String> = if value.is_empty() {
            Vec::new()
        } else {
            value.split(',').map(str::to_string).collect()
        };

        let previous = self.values.get("it").cloned();
        for item in items {
            self.values.insert("it".to_string(), item);
            body(self)?;
        }
        match previous {
            Some(item) => {
                self.values.insert("it".to_string(), item);
            }
            None => {
                self.values.remove("it");
            }
        }

        Ok(value)
    }
}
