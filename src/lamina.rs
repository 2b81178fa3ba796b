//! Compiler for the lamina template format.
//!
//! The pipeline mirrors the phases of the format:
//!
//! 1. **Lexing**: source text becomes a flat semantic token stream in two
//!    passes (a raw logos pass and a per-line assembly transformation).
//!    See [lexing].
//! 2. **Compilation**: the engine consumes tokens one logical template line
//!    per loop pass, tracking nesting through a depth-indexed
//!    deferred-closing stack, and emits an ordered list of template lines.
//!    See [engine].
//! 3. **Output**: a compiled template serializes as generated script text
//!    for a host evaluation environment ([engine::CompiledTemplate::to_source])
//!    or renders in-process through a pluggable expression evaluator
//!    ([render]).
//!
//! Indentation Handling
//!
//!     The engine never re-reads source text; indentation arrives as
//!     whitespace tokens whose content length is the nesting depth. The
//!     lexer emits one (possibly zero-length) whitespace token per
//!     non-blank line so that every depth transition, including a return
//!     to column zero, is visible to the deferred-closing stack.

pub mod compiler;
pub mod doctype;
pub mod engine;
pub mod expression;
pub mod formats;
pub mod lexing;
pub mod lines;
pub mod render;
pub mod stack;
pub mod testing;
pub mod token;

pub use compiler::{Compiler, Error};
pub use engine::{CompileEngine, CompileError, CompiledTemplate};
pub use lexing::{lex, LexError};
pub use lines::{ControlRole, TemplateLine};
pub use render::{html_escape, render, ExpressionEvaluator, RenderError};
pub use token::{Token, TokenKind};
