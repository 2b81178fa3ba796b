//! Template rendering
//!
//! A small interpreter that walks the compiled line list directly instead
//! of executing the generated script. Embedded expressions stay opaque:
//! their evaluation is delegated to a pluggable [`ExpressionEvaluator`].
//! The renderer itself implements only the closed fragment grammar the
//! engine emits:
//!
//! - triple-quoted string literals with `${…}` interpolation
//! - conversion-wrapped expressions `(expr).toString()`
//! - the `.htmlEscape()` suffix
//! - `+` concatenation of the above
//! - block bracketing through [`ControlRole`]
//!
//! Every render call allocates a fresh accumulator, so a compiled
//! template can be rendered repeatedly and concurrently from clones.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::engine::CompiledTemplate;
use super::lines::{ControlRole, TemplateLine, TRIPLE_QUOTE};

static INTERPOLATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^{}]*)\}").expect("interpolation pattern is valid"));

/// Errors that can occur during rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The evaluator failed on an embedded expression.
    Evaluation {
        expression: String,
        message: String,
    },
    /// An output expression outside the emitted fragment grammar.
    MalformedFragment(String),
    /// A block close without a matching open, or the reverse.
    UnbalancedBlock,
}

impl RenderError {
    /// Convenience constructor for evaluator implementations.
    pub fn evaluation(expression: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Evaluation {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Evaluation {
                expression,
                message,
            } => write!(f, "Render error: `{expression}`: {message}"),
            RenderError::MalformedFragment(fragment) => {
                write!(f, "Render error: malformed output fragment `{fragment}`")
            }
            RenderError::UnbalancedBlock => write!(f, "Render error: unbalanced block"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Evaluates the embedded expressions of a template.
///
/// `evaluate` resolves a single expression to its string conversion.
/// `evaluate_block` resolves a block-taking call: the implementation
/// decides how often to invoke `body` (once per iteration, say) and what
/// string the block call converts to. The body renders the nested lines
/// into the output through whatever evaluator it is handed, which lets
/// implementations introduce per-iteration scope.
pub trait ExpressionEvaluator {
    fn evaluate(&mut self, expression: &str) -> Result<String, RenderError>;

    fn evaluate_block(
        &mut self,
        expression: &str,
        body: &mut dyn FnMut(&mut dyn ExpressionEvaluator) -> Result<(), RenderError>,
    ) -> Result<String, RenderError>;
}

/// Replace `&`, `<` and `>` with their entities.
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a compiled template, delegating embedded expressions to the
/// evaluator. The output is the newline-joined accumulator.
pub fn render(
    template: &CompiledTemplate,
    evaluator: &mut dyn ExpressionEvaluator,
) -> Result<String, RenderError> {
    let mut output = Vec::new();
    render_lines(&template.lines, evaluator, &mut output)?;
    Ok(output.join("\n"))
}

fn render_lines(
    lines: &[TemplateLine],
    evaluator: &mut dyn ExpressionEvaluator,
    output: &mut Vec<String>,
) -> Result<(), RenderError> {
    let mut index = 0;
    while index < lines.len() {
        let line = &lines[index];
        match line {
            TemplateLine::Output { .. }
            | TemplateLine::HtmlSafe { .. }
            | TemplateLine::Expression { .. } => {
                output.push(evaluate_output_expression(
                    &line.output_expression(),
                    evaluator,
                )?);
                index += 1;
            }
            TemplateLine::Control { content, role, .. } => match role {
                ControlRole::Statement => {
                    if !content.is_empty() {
                        evaluator.evaluate(content)?;
                    }
                    index += 1;
                }
                ControlRole::CodeBlockOpen {
                    expression,
                    whitespace,
                } => {
                    let close = find_block_close(lines, index)?;
                    let body_lines = &lines[index + 1..close];
                    let mut body = |inner: &mut dyn ExpressionEvaluator| {
                        render_lines(body_lines, inner, output)
                    };
                    let value = evaluator.evaluate_block(expression, &mut body)?;
                    output.push(format!("{whitespace}{value}"));
                    index = close + 1;
                }
                ControlRole::SilentBlockOpen { expression } => {
                    let close = find_block_close(lines, index)?;
                    let body_lines = &lines[index + 1..close];
                    let mut body = |inner: &mut dyn ExpressionEvaluator| {
                        render_lines(body_lines, inner, output)
                    };
                    evaluator.evaluate_block(expression, &mut body)?;
                    index = close + 1;
                }
                ControlRole::BlockClose => return Err(RenderError::UnbalancedBlock),
            },
        }
    }
    Ok(())
}

/// Index of the block close matching the open at `open`, nesting-aware.
fn find_block_close(lines: &[TemplateLine], open: usize) -> Result<usize, RenderError> {
    let mut nesting = 0usize;
    for (index, line) in lines.iter().enumerate().skip(open + 1) {
        if let TemplateLine::Control { role, .. } = line {
            match role {
                ControlRole::CodeBlockOpen { .. } | ControlRole::SilentBlockOpen { .. } => {
                    nesting += 1
                }
                ControlRole::BlockClose if nesting == 0 => return Ok(index),
                ControlRole::BlockClose => nesting -= 1,
                ControlRole::Statement => {}
            }
        }
    }
    Err(RenderError::UnbalancedBlock)
}

/// Evaluate a full output expression: fragments joined by ` + `.
fn evaluate_output_expression(
    expression: &str,
    evaluator: &mut dyn ExpressionEvaluator,
) -> Result<String, RenderError> {
    let mut result = String::new();
    let mut rest = expression;
    loop {
        let (value, remaining) = evaluate_fragment(expression, rest, evaluator)?;
        result.push_str(&value);
        rest = remaining;
        if rest.is_empty() {
            return Ok(result);
        }
        rest = rest
            .strip_prefix(" + ")
            .ok_or_else(|| RenderError::MalformedFragment(expression.to_string()))?;
    }
}

/// Evaluate one fragment, returning its value and the unconsumed rest.
fn evaluate_fragment<'e>(
    whole: &str,
    fragment: &'e str,
    evaluator: &mut dyn ExpressionEvaluator,
) -> Result<(String, &'e str), RenderError> {
    let malformed = || RenderError::MalformedFragment(whole.to_string());

    if let Some(rest) = fragment.strip_prefix(TRIPLE_QUOTE) {
        let end = rest.find(TRIPLE_QUOTE).ok_or_else(malformed)?;
        let literal = &rest[..end];
        let mut rest = &rest[end + TRIPLE_QUOTE.len()..];
        let mut value = interpolate(literal, evaluator)?;
        if let Some(after) = rest.strip_prefix(".htmlEscape()") {
            value = html_escape(&value);
            rest = after;
        }
        Ok((value, rest))
    } else if fragment.starts_with('(') {
        let close = matching_paren(fragment).ok_or_else(malformed)?;
        let inner = &fragment[1..close];
        let mut rest = fragment[close + 1..]
            .strip_prefix(".toString()")
            .ok_or_else(malformed)?;
        let mut value = evaluator.evaluate(inner)?;
        if let Some(after) = rest.strip_prefix(".htmlEscape()") {
            value = html_escape(&value);
            rest = after;
        }
        Ok((value, rest))
    } else {
        Err(malformed())
    }
}

/// Byte index of the parenthesis closing the one at index 0.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, character) in text.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Evaluate `${…}` interpolations in a string literal. The encoder wraps
/// embedded expressions in the host's string conversion; the wrapper is
/// stripped so evaluators see the author-written expression text.
fn interpolate(
    text: &str,
    evaluator: &mut dyn ExpressionEvaluator,
) -> Result<String, RenderError> {
    if !text.contains("${") {
        return Ok(text.to_string());
    }
    let mut result = String::new();
    let mut last = 0;
    for captures in INTERPOLATION.captures_iter(text) {
        let whole = captures.get(0).expect("capture 0 is the whole match");
        result.push_str(&text[last..whole.start()]);
        let expression = unwrap_conversion(captures[1].trim());
        result.push_str(&evaluator.evaluate(expression)?);
        last = whole.end();
    }
    result.push_str(&text[last..]);
    Ok(result)
}

fn unwrap_conversion(expression: &str) -> &str {
    expression
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(").toString()"))
        .unwrap_or(expression)
}
