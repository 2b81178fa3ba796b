//! Template line model
//!
//! A compiled template is an ordered list of template lines. Each line
//! knows two renditions of itself: the fragment it contributes to the
//! rendered output (`output_expression`) and the literal statement emitted
//! into the generated script (`statement_form`). Four variants:
//!
//! - `Control`: a raw host statement with no direct output contribution.
//! - `Output`: text that is HTML-escaped at render time.
//! - `HtmlSafe`: markup text appended verbatim (tags, doctype, comments).
//! - `Expression`: a host expression whose value is the line's output.
//!
//! Control lines additionally carry a [`ControlRole`] so the renderer can
//! interpret block bracketing without re-parsing the emitted text; the
//! role never changes the statement form.

/// Name of the accumulator the generated script appends to.
pub const OUTPUT_ACCUMULATOR: &str = "_template_output";

/// Raw string delimiter in the generated script.
pub const TRIPLE_QUOTE: &str = "\"\"\"";

/// How a control line participates in rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRole {
    /// A raw host statement, or an empty depth marker.
    Statement,
    /// Opens a block whose string-converted result is appended, prefixed
    /// with the indentation captured at the opening line.
    CodeBlockOpen {
        expression: String,
        whitespace: String,
    },
    /// Opens a block executed for effect only.
    SilentBlockOpen { expression: String },
    /// Closes the nearest open block.
    BlockClose,
}

/// One emitted unit of compiled template output.
///
/// `depth` is the indentation level active when the line was created; it
/// is reset to 0 when the line takes part in one-liner fusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLine {
    Control {
        content: String,
        depth: usize,
        role: ControlRole,
    },
    Output {
        content: String,
        depth: usize,
    },
    HtmlSafe {
        content: String,
        depth: usize,
    },
    Expression {
        content: String,
        depth: usize,
    },
}

impl TemplateLine {
    pub fn output(content: impl Into<String>, depth: usize) -> Self {
        TemplateLine::Output {
            content: content.into(),
            depth,
        }
    }

    pub fn html_safe(content: impl Into<String>, depth: usize) -> Self {
        TemplateLine::HtmlSafe {
            content: content.into(),
            depth,
        }
    }

    pub fn expression(content: impl Into<String>, depth: usize) -> Self {
        TemplateLine::Expression {
            content: content.into(),
            depth,
        }
    }

    /// A raw host statement (silent inline code).
    pub fn statement(content: impl Into<String>) -> Self {
        TemplateLine::Control {
            content: content.into(),
            depth: 0,
            role: ControlRole::Statement,
        }
    }

    /// An empty depth marker for the deferred-closing stack.
    pub fn marker(depth: usize) -> Self {
        TemplateLine::Control {
            content: String::new(),
            depth,
            role: ControlRole::Statement,
        }
    }

    /// Opens a code block: the block call's string conversion is appended
    /// with the current indentation prefixed.
    pub fn code_block_open(expression: &str, whitespace: &str) -> Self {
        TemplateLine::Control {
            content: format!("{OUTPUT_ACCUMULATOR}.add(\"{whitespace}\" + ({expression} {{"),
            depth: 0,
            role: ControlRole::CodeBlockOpen {
                expression: expression.to_string(),
                whitespace: whitespace.to_string(),
            },
        }
    }

    pub fn code_block_close(depth: usize) -> Self {
        TemplateLine::Control {
            content: "}).toString())".to_string(),
            depth,
            role: ControlRole::BlockClose,
        }
    }

    /// Opens a silent block: the statement plus block-open syntax.
    pub fn silent_block_open(expression: &str) -> Self {
        TemplateLine::Control {
            content: format!("{expression} {{"),
            depth: 0,
            role: ControlRole::SilentBlockOpen {
                expression: expression.to_string(),
            },
        }
    }

    pub fn silent_block_close(depth: usize) -> Self {
        TemplateLine::Control {
            content: "}".to_string(),
            depth,
            role: ControlRole::BlockClose,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TemplateLine::Control { depth, .. }
            | TemplateLine::Output { depth, .. }
            | TemplateLine::HtmlSafe { depth, .. }
            | TemplateLine::Expression { depth, .. } => *depth,
        }
    }

    pub fn reset_depth(&mut self) {
        match self {
            TemplateLine::Control { depth, .. }
            | TemplateLine::Output { depth, .. }
            | TemplateLine::HtmlSafe { depth, .. }
            | TemplateLine::Expression { depth, .. } => *depth = 0,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TemplateLine::Control { content, .. }
            | TemplateLine::Output { content, .. }
            | TemplateLine::HtmlSafe { content, .. }
            | TemplateLine::Expression { content, .. } => content,
        }
    }

    /// The fragment this line appends to the rendered output.
    ///
    /// Panics for control lines; requesting their output is a programming
    /// error in the engine, not a user-facing failure.
    pub fn output_expression(&self) -> String {
        match self {
            TemplateLine::Control { .. } => panic!("control lines do not output anything"),
            TemplateLine::Output { content, depth } => format!(
                "{TRIPLE_QUOTE}{}{content}{TRIPLE_QUOTE}.htmlEscape()",
                " ".repeat(*depth)
            ),
            TemplateLine::HtmlSafe { content, depth } => format!(
                "{TRIPLE_QUOTE}{}{content}{TRIPLE_QUOTE}",
                " ".repeat(*depth)
            ),
            TemplateLine::Expression { content, depth } => {
                if *depth > 0 {
                    format!(
                        "{TRIPLE_QUOTE}{}{TRIPLE_QUOTE} + {content}",
                        " ".repeat(*depth)
                    )
                } else {
                    content.clone()
                }
            }
        }
    }

    /// The literal line emitted into the generated script. Empty for the
    /// depth markers, which the source serializer filters out.
    pub fn statement_form(&self) -> String {
        match self {
            TemplateLine::Control { content, .. } => content.clone(),
            _ => format!("{OUTPUT_ACCUMULATOR}.add({})", self.output_expression()),
        }
    }
}
