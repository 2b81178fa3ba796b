//! Compiler facade
//!
//! Ties the tokenizer and the compile engine together behind one entry
//! point. Each call runs an independent compile pass: the token stream
//! and the deferred-closing stack live inside that invocation and nothing
//! persists across calls.

use std::fmt;

use super::engine::{CompileEngine, CompileError, CompiledTemplate};
use super::lexing::{self, LexError};

/// Failure of either compiler phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Lex(LexError),
    Compile(CompileError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(error) => error.fmt(f),
            Error::Compile(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(error) => Some(error),
            Error::Compile(error) => Some(error),
        }
    }
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Error::Lex(error)
    }
}

impl From<CompileError> for Error {
    fn from(error: CompileError) -> Self {
        Error::Compile(error)
    }
}

/// The compiler entry point.
#[derive(Debug, Default)]
pub struct Compiler;

impl Compiler {
    pub fn new() -> Self {
        Compiler
    }

    /// Tokenize and compile a template source. The context type names the
    /// type the generated script binds the rendering receiver to.
    pub fn compile(&self, source: &str, context_type: &str) -> Result<CompiledTemplate, Error> {
        let tokens = lexing::lex(source)?;
        let engine = CompileEngine::new(&tokens, context_type);
        Ok(engine.run()?)
    }

    /// Generated script text for a template source.
    pub fn compile_to_source(&self, source: &str, context_type: &str) -> Result<String, Error> {
        Ok(self.compile(source, context_type)?.to_source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lamina::testing::MapEvaluator;

    #[test]
    fn test_empty_source_compiles() {
        let template = Compiler::new().compile("", "Unit").expect("compile failed");
        assert_eq!(template.lines, vec![]);
        assert_eq!(
            template.render(&mut MapEvaluator::new()),
            Ok(String::new())
        );
    }

    #[test]
    fn test_compile_to_source_is_deterministic() {
        let compiler = Compiler::new();
        let source = "%ul\n  %li one\n  %li two";
        let first = compiler.compile_to_source(source, "Page").unwrap();
        let second = compiler.compile_to_source(source, "Page").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lex_errors_surface() {
        let error = Compiler::new().compile("%p {", "Unit").unwrap_err();
        assert!(matches!(error, Error::Lex(_)));
    }

    #[test]
    fn test_compile_errors_surface() {
        let error = Compiler::new().compile(":filter", "Unit").unwrap_err();
        assert!(matches!(error, Error::Compile(_)));
    }
}
