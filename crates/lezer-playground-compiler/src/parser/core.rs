//! Token cursor and green-tree primitives used by the grammar productions.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::{SyntaxKind, TokenSet};
use super::lexer::{Token, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Lookaheads allowed between two consumed tokens before the parser counts as stuck.
const STALL_LIMIT: u32 = 256;

/// A `{` or `(` still waiting for its closer.
#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    at: TextRange,
}

/// Exec and recursion limits. Only the first exhausted limit is kept.
#[derive(Debug, Default)]
struct Budget {
    steps_left: Option<u32>,
    max_depth: Option<u32>,
    depth: u32,
    exhausted: Option<Error>,
}

impl Budget {
    fn step(&mut self) {
        match self.steps_left {
            Some(0) => self.exhaust(Error::ExecFuelExhausted),
            Some(left) => self.steps_left = Some(left - 1),
            None => {}
        }
    }

    fn descend(&mut self) -> bool {
        if self.max_depth.is_some_and(|max| self.depth >= max) {
            self.exhaust(Error::RecursionLimitExceeded);
            return false;
        }
        self.depth += 1;
        true
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn exhaust(&mut self, error: Error) {
        self.exhausted.get_or_insert(error);
    }
}

/// Recursive-descent parser over lexed grammar tokens.
///
/// Whitespace and comments are held back and emitted in front of whatever
/// node or token comes next, so they never end up as trailing children.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    /// One past the last significant token.
    end: usize,
    held_trivia: Vec<Token>,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Diagnostics,
    budget: Budget,
    last_report: Option<TextSize>,
    blocks: Vec<OpenBlock>,
    stall: Cell<u32>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        let end = tokens
            .iter()
            .rposition(|t| !t.kind.is_trivia())
            .map_or(0, |i| i + 1);
        Self {
            source,
            tokens,
            pos: 0,
            end,
            held_trivia: Vec::new(),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            budget: Budget::default(),
            last_report: None,
            blocks: Vec::new(),
            stall: Cell::new(STALL_LIMIT),
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.budget.steps_left = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.budget.max_depth = limit;
        self
    }

    pub(super) fn finish(mut self) -> Result<(GreenNode, Diagnostics), Error> {
        self.emit_held_trivia();
        match self.budget.exhausted {
            Some(error) => Err(error),
            None => Ok((self.builder.finish(), self.diagnostics)),
        }
    }

    // Cursor

    /// Kind of the next significant token, or `Error` past the end.
    pub(super) fn peek(&mut self) -> SyntaxKind {
        self.hold_trivia();
        self.guard_stall();
        self.tokens.get(self.pos).map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn peek_text(&mut self) -> &'src str {
        self.hold_trivia();
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(self.source, t))
    }

    pub(super) fn peek_span(&mut self) -> TextRange {
        self.hold_trivia();
        match self.tokens.get(self.pos) {
            Some(t) => t.span,
            None => TextRange::empty(self.eof_offset()),
        }
    }

    /// Whether the significant token after the current one is `kind`.
    pub(super) fn followed_by(&mut self, kind: SyntaxKind) -> bool {
        self.hold_trivia();
        self.guard_stall();
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(1)
            .is_some_and(|t| t.kind == kind)
    }

    pub(super) fn at(&mut self, kind: SyntaxKind) -> bool {
        !self.is_exhausted_input() && self.peek() == kind
    }

    pub(super) fn at_any(&mut self, set: TokenSet) -> bool {
        !self.is_exhausted_input() && set.contains(self.peek())
    }

    /// No significant input left, or a fuel limit ran out.
    pub(super) fn done(&self) -> bool {
        self.is_exhausted_input() || self.budget.exhausted.is_some()
    }

    fn is_exhausted_input(&self) -> bool {
        self.pos >= self.end
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    fn guard_stall(&self) {
        let left = self.stall.get();
        assert!(left != 0, "parser is stuck: too many lookaheads");
        self.stall.set(left - 1);
    }

    fn hold_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos)
            && token.kind.is_trivia()
        {
            self.held_trivia.push(*token);
            self.pos += 1;
        }
    }

    fn emit_held_trivia(&mut self) {
        for token in self.held_trivia.drain(..) {
            self.builder
                .token(token.kind.into(), token_text(self.source, &token));
        }
    }

    /// Moves pending trivia into the current node.
    pub(super) fn flush_trivia(&mut self) {
        self.hold_trivia();
        self.emit_held_trivia();
    }

    // Tree building

    pub(super) fn open(&mut self, kind: SyntaxKind) {
        self.emit_held_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn open_at(&mut self, mark: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(mark, kind.into());
    }

    pub(super) fn close(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn mark(&mut self) -> Checkpoint {
        self.emit_held_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn advance(&mut self) {
        assert!(!self.is_exhausted_input(), "advance past the last token");
        self.stall.set(STALL_LIMIT);
        self.budget.step();
        self.emit_held_trivia();

        let token = self.tokens[self.pos];
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
        self.pos += 1;
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.at(kind);
        if matched {
            self.advance();
        }
        matched
    }

    // Recursion

    pub(super) fn descend(&mut self) -> bool {
        self.stall.set(STALL_LIMIT);
        self.budget.descend()
    }

    pub(super) fn ascend(&mut self) {
        self.stall.set(STALL_LIMIT);
        self.budget.ascend();
    }

    // Delimited blocks

    /// Remembers the current opener so errors inside its block can be suppressed.
    pub(super) fn open_block(&mut self) {
        let at = self.peek_span();
        self.blocks.push(OpenBlock { at });
    }

    /// Pops the innermost block and consumes `closer`, reporting an unclosed block otherwise.
    pub(super) fn close_block(&mut self, closer: SyntaxKind, kind: DiagnosticKind, what: &str) {
        let opened = self.blocks.pop().map(|b| b.at);
        if self.eat(closer) {
            return;
        }

        let here = self.peek_span();
        if !self.first_report_at(here.start()) {
            return;
        }
        let opened = opened.unwrap_or(here);
        // Covers the whole block so errors inside it are suppressed.
        let covered = TextRange::new(opened.start(), here.end());
        self.diagnostics
            .report(kind, covered)
            .message(what)
            .related_to(format!("{what} starts here"), opened)
            .emit();
    }

    // Diagnostics

    pub(super) fn report(&mut self, kind: DiagnosticKind) {
        self.report_here(kind, None);
    }

    pub(super) fn report_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report_here(kind, Some(message.into()));
    }

    /// Reports at the current token and consumes it inside an `Error` node.
    pub(super) fn skip_with(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report_msg(kind, message);
        if !self.is_exhausted_input() {
            self.open(SyntaxKind::Error);
            self.advance();
            self.close();
        }
    }

    /// Reports at the current token, then wraps everything up to `recovery` in an `Error` node.
    pub(super) fn recover_until(
        &mut self,
        kind: DiagnosticKind,
        message: &str,
        recovery: TokenSet,
    ) {
        if self.at_any(recovery) || self.done() {
            self.report_msg(kind, message);
            return;
        }

        self.open(SyntaxKind::Error);
        self.report_msg(kind, message);
        while !self.at_any(recovery) && !self.done() {
            self.advance();
        }
        self.close();
    }

    fn report_here(&mut self, kind: DiagnosticKind, message: Option<String>) {
        let span = self.peek_span();
        if !self.first_report_at(span.start()) {
            return;
        }
        let suppression = match self.blocks.last() {
            Some(block) => TextRange::new(block.at.start(), self.eof_offset()),
            None => span,
        };

        let mut report = self
            .diagnostics
            .report(kind, span)
            .suppression_range(suppression);
        if let Some(message) = message {
            report = report.message(message);
        }
        report.emit();
    }

    /// One diagnostic per position; later ones at the same offset are cascades.
    fn first_report_at(&mut self, pos: TextSize) -> bool {
        if self.last_report == Some(pos) {
            return false;
        }
        self.last_report = Some(pos);
        true
    }
}
