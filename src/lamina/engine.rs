//! Compile engine
//!
//! The driver of the compiler: consumes the semantic token stream one
//! logical template line per loop pass, dispatches to per-construct
//! handlers (doctype, tag, code, silent code, comment, text), tracks
//! nesting through the deferred-closing stack and emits the ordered
//! template line list.
//!
//! Each pass optionally consumes an indentation token (flushing every
//! deferred entry at or below the new depth), then at most one tag
//! construct and at most one content construct. When a tag and a content
//! construct share a line and the next token closes immediately, the
//! opening tag, the content and the pending closing tag fuse into a single
//! expression line so the rendered output carries no duplicated
//! indentation.
//!
//! The engine is a pure function of the token sequence: it owns an
//! explicit index cursor (`peek`/`advance`) and a per-invocation stack,
//! shares nothing, and either returns the compiled template or the first
//! error.

use std::fmt;

use super::doctype;
use super::expression::expression_code;
use super::lines::{TemplateLine, OUTPUT_ACCUMULATOR};
use super::render::{render, ExpressionEvaluator, RenderError};
use super::stack::DeferredStack;
use super::token::{Token, TokenKind};

/// Errors that can occur during compilation
///
/// All variants are unrecoverable: compilation aborts on the first error
/// and no partial output is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No construct matched at the cursor position.
    UnexpectedToken(Token),
    /// A token of the wrong kind where a specific set was required.
    ExpectedOther {
        found: Token,
        expected: Vec<TokenKind>,
    },
    /// Lookahead required a token but the stream was exhausted.
    UnexpectedEndOfInput,
    /// A doctype literal outside the fixed mapping.
    UnexpectedDocType(Token),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnexpectedToken(token) => write!(
                f,
                "Compile error: no construct matches {:?} `{}` at line {}, column {}",
                token.kind, token.content, token.line, token.column
            ),
            CompileError::ExpectedOther { found, expected } => write!(
                f,
                "Compile error: expected one of {:?}, found {:?} `{}` at line {}, column {}",
                expected, found.kind, found.content, found.line, found.column
            ),
            CompileError::UnexpectedEndOfInput => {
                write!(f, "Compile error: unexpected end of input")
            }
            CompileError::UnexpectedDocType(token) => write!(
                f,
                "Compile error: unknown doctype `{}` at line {}, column {}",
                token.content, token.line, token.column
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// A compiled template: the ordered body lines plus the context type the
/// generated script binds.
///
/// The body carries no boilerplate; [`CompiledTemplate::to_source`]
/// attaches it, and [`CompiledTemplate::render`] interprets the lines
/// directly. Rendering allocates a fresh accumulator per call, so a
/// compiled template can be rendered repeatedly and from multiple clones
/// concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    pub context_type: String,
    pub lines: Vec<TemplateLine>,
}

const ESCAPE_DEFINITION: &str = "fun String.htmlEscape(): String { return replace(\"&\", \"&amp;\").replace(\"<\", \"&lt;\").replace(\">\", \"&gt;\") }";

impl CompiledTemplate {
    /// Generated script text: accumulator initialization and the escape
    /// helper, the rendering body applied with the bound context as
    /// receiver, and the newline-joined accumulator as the trailing
    /// expression. Empty statement forms (depth markers) are dropped.
    pub fn to_source(&self) -> String {
        let mut statements = vec![
            format!("val {OUTPUT_ACCUMULATOR} = mutableListOf<String>()"),
            ESCAPE_DEFINITION.to_string(),
            format!("(bindings[\"context\"] as {}).apply({{", self.context_type),
        ];
        statements.extend(self.lines.iter().map(TemplateLine::statement_form));
        statements.push("})".to_string());
        statements.push(format!("{OUTPUT_ACCUMULATOR}.joinToString(\"\\n\")"));

        statements
            .into_iter()
            .filter(|statement| !statement.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the template in-process, delegating embedded expressions to
    /// the evaluator.
    pub fn render(
        &self,
        evaluator: &mut dyn ExpressionEvaluator,
    ) -> Result<String, RenderError> {
        render(self, evaluator)
    }
}

/// One compile invocation: the token cursor, the line list under
/// construction and the deferred-closing stack.
pub struct CompileEngine<'a> {
    tokens: &'a [Token],
    context_type: String,
    cursor: usize,
    lines: Vec<TemplateLine>,
    deferred: DeferredStack,
}

impl<'a> CompileEngine<'a> {
    pub fn new(tokens: &'a [Token], context_type: impl Into<String>) -> Self {
        CompileEngine {
            tokens,
            context_type: context_type.into(),
            cursor: 0,
            lines: Vec::new(),
            deferred: DeferredStack::new(),
        }
    }

    /// Run the compile loop to completion.
    ///
    /// One loop pass processes one logical template line. A pass that
    /// consumes no token fails with [`CompileError::UnexpectedToken`].
    pub fn run(mut self) -> Result<CompiledTemplate, CompileError> {
        self.unshift_doc_type()?;

        while self.cursor < self.tokens.len() {
            let start = self.cursor;

            self.unshift_white_space();

            let had_tag = self.unshift_tag()?;

            let had_output = self.unshift_code()?
                || self.unshift_silent_code()?
                || self.unshift_comment()
                || self.unshift_text();

            // a tag with inline content can close on the same line
            if had_tag && had_output && self.next_is_closing_whitespace() {
                self.fuse_one_liner();
            }

            if self.cursor == start {
                return Err(CompileError::UnexpectedToken(
                    self.tokens[self.cursor].clone(),
                ));
            }
        }

        self.close_open_tags(0);
        debug_assert!(self.deferred.is_empty());

        Ok(CompiledTemplate {
            context_type: self.context_type,
            lines: self.lines,
        })
    }

    // --- construct handlers ---

    fn unshift_doc_type(&mut self) -> Result<bool, CompileError> {
        if self.next_if_kind(&[TokenKind::DocTypeIdentifier]).is_none() {
            return Ok(false);
        }
        let literal = self.next_if_kind(&[TokenKind::DocType]).cloned();

        let declaration = match &literal {
            None => doctype::DEFAULT,
            Some(token) => doctype::declaration(&token.content)
                .ok_or_else(|| CompileError::UnexpectedDocType(token.clone()))?,
        };

        let depth = self.current_depth();
        self.lines.push(TemplateLine::html_safe(declaration, depth));
        Ok(true)
    }

    fn unshift_white_space(&mut self) -> bool {
        let Some(token) = self.next_if_kind(&[TokenKind::WhiteSpace]) else {
            return false;
        };
        let len = token.content_len();

        self.close_open_tags(len);

        // remember as current depth
        self.deferred.push(TemplateLine::marker(len));
        true
    }

    fn unshift_tag(&mut self) -> Result<bool, CompileError> {
        let element = self.next_if_kind(&[TokenKind::ElementIdentifier]);
        let element_expression = match element {
            Some(_) => Some(self.next_force_kind(&[
                TokenKind::BracketExpression,
                TokenKind::String,
            ])?),
            None => None,
        };

        let element_id = self.next_if_kind(&[TokenKind::ElementIdIdentifier]);
        let element_id_expression = match element_id {
            Some(_) => Some(self.next_force_kind(&[
                TokenKind::BracketExpression,
                TokenKind::String,
            ])?),
            None => None,
        };

        let element_class = self.next_if_kind(&[TokenKind::ElementClassIdentifier]);
        let element_class_expression = match element_class {
            Some(_) => Some(self.next_force_kind(&[
                TokenKind::BracketExpression,
                TokenKind::String,
            ])?),
            None => None,
        };

        // must have at least one defined
        if element.is_none() && element_id.is_none() && element_class.is_none() {
            return Ok(false);
        }

        let mut attributes = Vec::new();
        while let Some(name) =
            self.next_if_kind(&[TokenKind::BracketExpression, TokenKind::String])
        {
            self.next_force_kind(&[TokenKind::AttributeConnector])?;
            let value = self.next_force_kind(&[
                TokenKind::BracketExpression,
                TokenKind::QuotedString,
                TokenKind::String,
            ])?;
            attributes.push((name, value));
        }

        let name = match element_expression {
            None => "div".to_string(),
            Some(token) => expression_code(token, true)?,
        };
        let id = match element_id_expression {
            None => String::new(),
            Some(token) => attribute_string("id", token)?,
        };
        let classes = match element_class_expression {
            None => String::new(),
            Some(token) => attribute_string("class", token)?,
        };
        let attribute = attributes
            .iter()
            .map(|(attr_name, attr_value)| attribute_code(attr_name, attr_value))
            .collect::<Result<Vec<_>, _>>()?
            .join("");

        let depth = self.current_depth();
        if self.next_is_closing_whitespace() {
            self.lines.push(TemplateLine::html_safe(
                format!("<{name}{id}{classes}{attribute}></{name}>"),
                depth,
            ));
        } else {
            self.lines.push(TemplateLine::html_safe(
                format!("<{name}{id}{classes}{attribute}>"),
                depth,
            ));
            self.deferred
                .push(TemplateLine::html_safe(format!("</{name}>"), depth));
        }

        Ok(true)
    }

    fn unshift_code(&mut self) -> Result<bool, CompileError> {
        if self.next_if_kind(&[TokenKind::CodeIdentifier]).is_none() {
            return Ok(false);
        }
        let code = self.next_force_kind(&[TokenKind::Expression])?;

        if self.next_is_deeper_whitespace() {
            let whitespace = self.current_whitespace();
            let depth = self.current_depth();
            self.lines
                .push(TemplateLine::code_block_open(&code.content, &whitespace));
            self.deferred.push(TemplateLine::code_block_close(depth));
        } else {
            let depth = self.current_depth();
            let line = TemplateLine::expression(expression_code(code, false)?, depth);
            self.lines.push(line);
        }

        Ok(true)
    }

    fn unshift_silent_code(&mut self) -> Result<bool, CompileError> {
        if self
            .next_if_kind(&[TokenKind::SilentCodeIdentifier])
            .is_none()
        {
            return Ok(false);
        }
        let code = self.next_force_kind(&[TokenKind::Expression])?;

        if self.next_is_deeper_whitespace() {
            let depth = self.current_depth();
            self.lines
                .push(TemplateLine::silent_block_open(&code.content));
            self.deferred.push(TemplateLine::silent_block_close(depth));
        } else {
            self.lines.push(TemplateLine::statement(&code.content));
        }

        Ok(true)
    }

    fn unshift_comment(&mut self) -> bool {
        let Some(token) = self.next_if_kind(&[TokenKind::Comment]) else {
            return false;
        };
        let content = format!("<!-- {} -->", token.content);
        let depth = self.current_depth();
        self.lines.push(TemplateLine::html_safe(content, depth));
        true
    }

    fn unshift_text(&mut self) -> bool {
        let Some(token) = self.next_if_kind(&[TokenKind::Text]) else {
            return false;
        };
        let line = TemplateLine::output(token.content.clone(), self.current_depth());
        self.lines.push(line);
        true
    }

    /// Fuse the three most recent fragments of a one-liner tag (opening
    /// tag, inline content and the pending closing tag) into a single
    /// expression line at the opening tag's depth.
    ///
    /// The caller has already verified that a tag and a content construct
    /// matched on this pass and that the next token closes immediately;
    /// anything else is a programming error in the engine.
    fn fuse_one_liner(&mut self) {
        let mut content_line = self
            .lines
            .pop()
            .expect("one-liner fusion requires a content line");
        let mut opening_line = self
            .lines
            .pop()
            .expect("one-liner fusion requires an opening tag line");
        let mut closing_line = self
            .deferred
            .pop()
            .expect("one-liner fusion requires a pending closing tag");
        let depth = opening_line.depth();

        opening_line.reset_depth();
        content_line.reset_depth();
        closing_line.reset_depth();

        let expression = [
            opening_line.output_expression(),
            content_line.output_expression(),
            closing_line.output_expression(),
        ]
        .join(" + ");

        self.lines.push(TemplateLine::expression(expression, depth));
    }

    /// Flush every deferred entry whose depth is at or above `down_to`.
    fn close_open_tags(&mut self, down_to: usize) {
        while !self.deferred.is_empty() && self.deferred.current_depth() >= down_to {
            if let Some(line) = self.deferred.pop() {
                self.lines.push(line);
            }
        }
    }

    // --- cursor ---

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    fn next_if_kind(&mut self, kinds: &[TokenKind]) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor)?;
        if kinds.contains(&token.kind) {
            self.cursor += 1;
            Some(token)
        } else {
            None
        }
    }

    fn next_force_kind(&mut self, kinds: &[TokenKind]) -> Result<&'a Token, CompileError> {
        if let Some(token) = self.next_if_kind(kinds) {
            return Ok(token);
        }
        match self.peek() {
            Some(token) => Err(CompileError::ExpectedOther {
                found: token.clone(),
                expected: kinds.to_vec(),
            }),
            None => Err(CompileError::UnexpectedEndOfInput),
        }
    }

    fn next_is_deeper_whitespace(&self) -> bool {
        match self.peek() {
            Some(token) => {
                token.kind == TokenKind::WhiteSpace
                    && token.content_len() > self.current_depth()
            }
            None => false,
        }
    }

    fn next_is_closing_whitespace(&self) -> bool {
        match self.peek() {
            // end of input, will be closed
            None => true,
            Some(token) => {
                token.kind == TokenKind::WhiteSpace
                    && token.content_len() <= self.current_depth()
            }
        }
    }

    fn current_depth(&self) -> usize {
        self.deferred.current_depth()
    }

    fn current_whitespace(&self) -> String {
        " ".repeat(self.current_depth())
    }
}

fn attribute_string(name: &str, value: &Token) -> Result<String, CompileError> {
    let value_expression = expression_code(value, true)?;
    Ok(format!(" {name}=\"{value_expression}\""))
}

fn attribute_code(name: &Token, value: &Token) -> Result<String, CompileError> {
    let name_expression = expression_code(name, true)?;
    let value_expression = expression_code(value, true)?;
    Ok(format!(" {name_expression}=\"{value_expression}\""))
}
