//! Line assembly transformation
//!
//! Turns the raw core token stream into the semantic tokens the compile
//! engine consumes. Raw tokens are grouped into source lines at newline
//! boundaries; each non-blank line is assembled with an explicit cursor:
//!
//! 1. Indentation: a leading whitespace run becomes a whitespace token.
//!    Every non-blank line after the first emitted line gets one even when
//!    unindented (zero-length content). Blank lines emit nothing.
//! 2. Doctype: `!!!` plus an optional rest-of-line literal.
//! 3. Tag prefix: `%`/`#`/`.` markers, each with an immediately adjacent
//!    brace expression or bare word run as its value.
//! 4. Attributes (after a tag prefix only): `name=value` pairs, probed
//!    with backtracking so a bare word that is not an attribute falls
//!    through to inline content.
//! 5. Content: `=` code (after a tag or at line start), and at line start
//!    only: `-` silent code, `/` comment, `:` filter. Anything else is a
//!    single text token running to the end of the line.
//!
//! Rest-of-line content (expressions, comments, text, doctype literals) is
//! sliced from the source, so the raw token granularity inside it does not
//! matter.

use super::tokens_core::CoreToken;
use crate::lamina::token::{Token, TokenKind};
use std::ops::Range;

/// Assemble the semantic token stream from raw core tokens.
pub fn assemble(source: &str, core: &[(CoreToken, logos::Span)]) -> Vec<Token> {
    let mut out = Vec::new();
    let mut line_no = 1usize;
    let mut line_start = 0usize;
    let mut index = 0usize;

    while index < core.len() {
        let begin = index;
        while index < core.len() && core[index].0 != CoreToken::Newline {
            index += 1;
        }
        assemble_line(source, &core[begin..index], line_no, line_start, &mut out);

        if index < core.len() {
            line_start = core[index].1.end;
            index += 1;
        }
        line_no += 1;
    }

    out
}

fn assemble_line(
    source: &str,
    tokens: &[(CoreToken, logos::Span)],
    line: usize,
    line_start: usize,
    out: &mut Vec<Token>,
) {
    // blank and whitespace-only lines produce no tokens
    if tokens.iter().all(|(kind, _)| *kind == CoreToken::Whitespace) {
        return;
    }

    let mut cursor = LineCursor {
        source,
        tokens,
        pos: 0,
        line,
        line_start,
    };

    // indentation; a zero-length whitespace token keeps depth transitions
    // visible on unindented lines, except for the very first emitted line
    // so a leading doctype still appears as the very first token
    if cursor.at(CoreToken::Whitespace) {
        let range = cursor.bump();
        out.push(cursor.token(TokenKind::WhiteSpace, range));
    } else if !out.is_empty() {
        out.push(Token::new(TokenKind::WhiteSpace, "", line, 1, line_start));
    }

    if cursor.at(CoreToken::DocTypeMarker) {
        let range = cursor.bump();
        out.push(cursor.token(TokenKind::DocTypeIdentifier, range));
        cursor.skip_whitespace();
        if let Some((content, offset)) = cursor.rest_of_line() {
            out.push(cursor.token_at(TokenKind::DocType, content, offset));
        }
        return;
    }

    let mut had_tag = false;
    if cursor.at(CoreToken::Percent) {
        let range = cursor.bump();
        out.push(cursor.token(TokenKind::ElementIdentifier, range));
        tag_value(&mut cursor, out);
        had_tag = true;
    }
    if cursor.at(CoreToken::Hash) {
        let range = cursor.bump();
        out.push(cursor.token(TokenKind::ElementIdIdentifier, range));
        tag_value(&mut cursor, out);
        had_tag = true;
    }
    if cursor.at(CoreToken::Dot) {
        let range = cursor.bump();
        out.push(cursor.token(TokenKind::ElementClassIdentifier, range));
        tag_value(&mut cursor, out);
        had_tag = true;
    }

    if had_tag {
        attributes(&mut cursor, out);
        cursor.skip_whitespace();
        if cursor.done() {
            return;
        }
        if cursor.at(CoreToken::Equals) {
            code(&mut cursor, out);
        } else {
            text(&mut cursor, out);
        }
        return;
    }

    // line-start content
    match cursor.kind() {
        Some(CoreToken::Equals) => code(&mut cursor, out),
        Some(CoreToken::Dash) => {
            let range = cursor.bump();
            out.push(cursor.token(TokenKind::SilentCodeIdentifier, range));
            cursor.skip_whitespace();
            if let Some((content, offset)) = cursor.rest_of_line() {
                out.push(cursor.token_at(TokenKind::Expression, content, offset));
            }
        }
        Some(CoreToken::Slash) => {
            cursor.bump();
            cursor.skip_whitespace();
            // the engine triggers on the comment token alone
            let (content, offset) = cursor.rest_of_line().unwrap_or(("", line_start));
            out.push(cursor.token_at(TokenKind::Comment, content, offset));
        }
        Some(CoreToken::Colon) => {
            let range = cursor.bump();
            out.push(cursor.token(TokenKind::FilterIdentifier, range));
            if let Some(range) = cursor.word_run() {
                out.push(cursor.token(TokenKind::String, range));
            }
        }
        Some(_) => text(&mut cursor, out),
        None => {}
    }
}

/// `= expression`: code marker plus the rest of the line.
fn code(cursor: &mut LineCursor<'_>, out: &mut Vec<Token>) {
    let range = cursor.bump();
    out.push(cursor.token(TokenKind::CodeIdentifier, range));
    cursor.skip_whitespace();
    if let Some((content, offset)) = cursor.rest_of_line() {
        out.push(cursor.token_at(TokenKind::Expression, content, offset));
    }
}

/// Everything else: one text token to the end of the line.
fn text(cursor: &mut LineCursor<'_>, out: &mut Vec<Token>) {
    cursor.skip_whitespace();
    if let Some((content, offset)) = cursor.rest_of_line() {
        out.push(cursor.token_at(TokenKind::Text, content, offset));
    }
}

/// A tag marker's value: an immediately adjacent brace expression or bare
/// word run. A marker with no adjacent value emits nothing here; the
/// engine reports the missing value.
fn tag_value(cursor: &mut LineCursor<'_>, out: &mut Vec<Token>) {
    let marker_end = cursor.tokens[cursor.pos - 1].1.end;
    if cursor.at(CoreToken::BraceExpression) && cursor.span_start() == Some(marker_end) {
        let range = cursor.bump();
        out.push(cursor.token(TokenKind::BracketExpression, range));
    } else if cursor.span_start() == Some(marker_end) {
        if let Some(range) = cursor.word_run() {
            out.push(cursor.token(TokenKind::String, range));
        }
    }
}

/// `name=value` pairs after a tag prefix. Probes with backtracking: a
/// name without a connector is not an attribute and the cursor rewinds so
/// the remainder becomes inline content.
fn attributes(cursor: &mut LineCursor<'_>, out: &mut Vec<Token>) {
    loop {
        let save = cursor.pos;
        cursor.skip_whitespace();

        let name = if cursor.at(CoreToken::BraceExpression) {
            let range = cursor.bump();
            Some((TokenKind::BracketExpression, range))
        } else {
            cursor.word_run().map(|range| (TokenKind::String, range))
        };
        let Some((name_kind, name_range)) = name else {
            cursor.pos = save;
            return;
        };

        cursor.skip_whitespace();
        if !cursor.at(CoreToken::Equals) {
            cursor.pos = save;
            return;
        }
        let connector = cursor.bump();

        out.push(cursor.token(name_kind, name_range));
        out.push(cursor.token(TokenKind::AttributeConnector, connector));

        cursor.skip_whitespace();
        if cursor.at(CoreToken::BraceExpression) {
            let range = cursor.bump();
            out.push(cursor.token(TokenKind::BracketExpression, range));
        } else if cursor.at(CoreToken::QuotedString) {
            let range = cursor.bump();
            out.push(cursor.token(TokenKind::QuotedString, range));
        } else if let Some(range) = cursor.value_run() {
            out.push(cursor.token(TokenKind::String, range));
        } else {
            // `name=` at end of line; the engine reports the missing value
            return;
        }
    }
}

struct LineCursor<'a> {
    source: &'a str,
    tokens: &'a [(CoreToken, logos::Span)],
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> LineCursor<'a> {
    fn done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn kind(&self) -> Option<CoreToken> {
        self.tokens.get(self.pos).map(|(kind, _)| *kind)
    }

    fn at(&self, kind: CoreToken) -> bool {
        self.kind() == Some(kind)
    }

    fn span_start(&self) -> Option<usize> {
        self.tokens.get(self.pos).map(|(_, span)| span.start)
    }

    fn bump(&mut self) -> Range<usize> {
        let span = self.tokens[self.pos].1.clone();
        self.pos += 1;
        span
    }

    fn skip_whitespace(&mut self) {
        while self.at(CoreToken::Whitespace) {
            self.pos += 1;
        }
    }

    /// Consume a contiguous run of word-forming tokens (words and dashes
    /// with no gap between them).
    fn word_run(&mut self) -> Option<Range<usize>> {
        if !self.kind().is_some_and(|kind| kind.is_word_part()) {
            return None;
        }
        let start = self.tokens[self.pos].1.start;
        let mut end = self.tokens[self.pos].1.end;
        self.pos += 1;
        while self.kind().is_some_and(|kind| kind.is_word_part())
            && self.span_start() == Some(end)
        {
            end = self.tokens[self.pos].1.end;
            self.pos += 1;
        }
        Some(start..end)
    }

    /// Consume everything up to the next whitespace (attribute values).
    fn value_run(&mut self) -> Option<Range<usize>> {
        if self.done() || self.at(CoreToken::Whitespace) {
            return None;
        }
        let start = self.tokens[self.pos].1.start;
        let mut end = self.tokens[self.pos].1.end;
        self.pos += 1;
        while !self.done() && !self.at(CoreToken::Whitespace) {
            end = self.tokens[self.pos].1.end;
            self.pos += 1;
        }
        Some(start..end)
    }

    /// The source text from the current token to the end of the line,
    /// trailing whitespace trimmed. `None` when nothing remains.
    fn rest_of_line(&self) -> Option<(&'a str, usize)> {
        if self.done() {
            return None;
        }
        let start = self.tokens[self.pos].1.start;
        let end = self.tokens[self.tokens.len() - 1].1.end;
        let content = self.source[start..end].trim_end();
        if content.is_empty() {
            return None;
        }
        Some((content, start))
    }

    fn token(&self, kind: TokenKind, range: Range<usize>) -> Token {
        let content = &self.source[range.clone()];
        self.token_at(kind, content, range.start)
    }

    fn token_at(&self, kind: TokenKind, content: &str, offset: usize) -> Token {
        Token::new(kind, content, self.line, offset - self.line_start + 1, offset)
    }
}
