//! # lamina
//!
//! A compiler for the lamina template format: an indentation-sensitive HTML
//! markup language with embedded expressions. Source text is tokenized,
//! compiled one logical line at a time into an ordered list of template
//! lines, and either serialized as generated script text for a host
//! evaluation environment or rendered in-process through a pluggable
//! expression evaluator.
//!
//! ## Testing
//!
//! Parser tests assert exact token sequences and line lists; see the
//! [testing module](lamina::testing) for the factories and the map-backed
//! evaluator used throughout the test suite.

pub mod lamina;

pub use lamina::compiler::{Compiler, Error};
pub use lamina::engine::{CompileError, CompiledTemplate};
pub use lamina::lexing::LexError;
pub use lamina::render::{ExpressionEvaluator, RenderError};
pub use lamina::token::{Token, TokenKind};
