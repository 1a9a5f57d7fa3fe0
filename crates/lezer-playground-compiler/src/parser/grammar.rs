//! Grammar productions for the Lezer grammar language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.

use super::core::Parser;

use super::cst::SyntaxKind;
use super::cst::token_sets::{ATOM_FIRST, ITEM_RECOVERY, PRECEDENCE_ENTRY, REPEAT_OPS, SEQ_END};
use crate::diagnostics::DiagnosticKind;

/// At-names that start a top-level declaration.
const DECLARATIONS: &[&str] = &[
    "@top",
    "@tokens",
    "@skip",
    "@precedence",
    "@detectDelim",
    "@external",
    "@dialects",
    "@context",
    "@local",
];

/// Declarations recognized but not compiled.
const UNSUPPORTED_DECLARATIONS: &[&str] = &["@external", "@dialects", "@context", "@local"];

const BUILTINS: &[&str] = &[
    "@asciiLetter",
    "@asciiUpperCase",
    "@asciiLowerCase",
    "@digit",
    "@whitespace",
    "@eof",
];

/// Expression-level at-names recognized but not compiled.
const UNSUPPORTED_EXPRESSIONS: &[&str] = &["@specialize", "@extend", "@else"];

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.open(SyntaxKind::Root);

        while !self.done() {
            match self.peek() {
                SyntaxKind::AtName => self.parse_declaration(),
                SyntaxKind::Id => self.parse_rule(SyntaxKind::Rule),
                _ => self.recover_until(
                    DiagnosticKind::UnexpectedToken,
                    "expected a rule or a declaration",
                    ITEM_RECOVERY,
                ),
            }
        }

        self.flush_trivia();
        self.close();
    }

    fn parse_declaration(&mut self) {
        debug_assert_eq!(self.peek(), SyntaxKind::AtName);
        match self.peek_text() {
            "@top" => self.parse_rule(SyntaxKind::TopRule),
            "@tokens" => self.parse_tokens_block(),
            "@skip" => self.parse_skip(),
            "@precedence" => self.parse_precedence(SyntaxKind::Precedence),
            "@detectDelim" => {
                self.open(SyntaxKind::Directive);
                self.advance();
                self.close();
            }
            name if UNSUPPORTED_DECLARATIONS.contains(&name) => {
                let message = format!("`{name}` declarations");
                self.parse_unsupported_decl(DiagnosticKind::Unsupported, message);
            }
            name => {
                let message = name.to_string();
                self.parse_unsupported_decl(DiagnosticKind::UnknownDeclaration, message);
            }
        }
    }

    /// `Name { expr }` or `@top Name { expr }`
    fn parse_rule(&mut self, kind: SyntaxKind) {
        self.open(kind);

        if kind == SyntaxKind::TopRule {
            self.advance(); // consume '@top'
        }

        if !self.eat(SyntaxKind::Id) {
            self.report_msg(DiagnosticKind::ExpectedRuleName, "e.g. `Program`");
        }

        if self.at(SyntaxKind::AngleOpen) {
            self.parse_unsupported_group(
                SyntaxKind::AngleOpen,
                SyntaxKind::AngleClose,
                "rule parameters",
            );
        }
        if self.at(SyntaxKind::BracketOpen) {
            self.parse_unsupported_group(
                SyntaxKind::BracketOpen,
                SyntaxKind::BracketClose,
                "rule properties",
            );
        }

        self.parse_body();
        self.close();
    }

    /// `{ expr }`
    fn parse_body(&mut self) {
        if !self.at(SyntaxKind::BraceOpen) {
            self.report(DiagnosticKind::ExpectedBody);
            return;
        }

        self.open(SyntaxKind::Body);
        self.open_block();
        self.advance(); // consume '{'

        loop {
            self.parse_choice();
            if self.at(SyntaxKind::ParenClose) {
                self.skip_with(DiagnosticKind::UnexpectedToken, "unmatched `)`");
                continue;
            }
            break;
        }

        self.close_block(SyntaxKind::BraceClose, DiagnosticKind::UnclosedBlock, "rule body");
        self.close();
    }

    /// `a | b | c`. A single alternative is not wrapped.
    fn parse_choice(&mut self) {
        if !self.descend() {
            self.open(SyntaxKind::Error);
            while !self.done() {
                self.advance();
            }
            self.close();
            return;
        }

        let mark = self.mark();
        self.parse_seq();

        if self.at(SyntaxKind::Pipe) {
            self.open_at(mark, SyntaxKind::Choice);
            while self.eat(SyntaxKind::Pipe) {
                self.parse_seq();
            }
            self.close();
        }

        self.ascend();
    }

    /// Items up to `|`, a closing delimiter, or the start of the next declaration.
    /// Zero or several items are wrapped in `Seq`; one item stands alone.
    fn parse_seq(&mut self) {
        let mark = self.mark();
        let mut count = 0;

        loop {
            if self.done()
                || self.at_any(SEQ_END)
                || self.at_declaration_start()
            {
                break;
            }
            if self.at_any(ATOM_FIRST) {
                self.parse_postfix();
                count += 1;
            } else {
                self.skip_with(DiagnosticKind::UnexpectedToken, "not a valid expression");
            }
        }

        if count != 1 {
            self.open_at(mark, SyntaxKind::Seq);
            self.close();
        }
    }

    /// Heuristic for a missing `}`: the next rule or declaration begins here.
    fn at_declaration_start(&mut self) -> bool {
        match self.peek() {
            SyntaxKind::Id => self.followed_by(SyntaxKind::BraceOpen),
            SyntaxKind::AtName => DECLARATIONS.contains(&self.peek_text()),
            _ => false,
        }
    }

    fn parse_postfix(&mut self) {
        let mark = self.mark();
        self.parse_atom();

        while self.at_any(REPEAT_OPS) {
            self.open_at(mark, SyntaxKind::Repeat);
            self.advance();
            self.close();
        }
    }

    fn parse_atom(&mut self) {
        match self.peek() {
            SyntaxKind::Id => {
                self.open(SyntaxKind::Ref);
                self.advance();
                if self.at(SyntaxKind::AngleOpen) {
                    self.parse_unsupported_group(
                        SyntaxKind::AngleOpen,
                        SyntaxKind::AngleClose,
                        "rule arguments",
                    );
                }
                self.close();
            }
            SyntaxKind::Str => self.parse_leaf(SyntaxKind::Literal),
            SyntaxKind::CharClass | SyntaxKind::NegCharClass => {
                self.parse_leaf(SyntaxKind::CharSet);
            }
            SyntaxKind::Underscore => self.parse_leaf(SyntaxKind::AnyChar),
            SyntaxKind::ParenOpen => self.parse_group(),
            SyntaxKind::Bang | SyntaxKind::Tilde => self.parse_marker(),
            SyntaxKind::AtName => self.parse_at_expression(),
            _ => {
                self.skip_with(DiagnosticKind::UnexpectedToken, "not a valid expression");
            }
        }
    }

    fn parse_leaf(&mut self, kind: SyntaxKind) {
        self.open(kind);
        self.advance();
        self.close();
    }

    /// `( expr )`
    fn parse_group(&mut self) {
        self.open(SyntaxKind::Group);
        self.open_block();
        self.advance(); // consume '('

        self.parse_choice();

        self.close_block(SyntaxKind::ParenClose, DiagnosticKind::UnclosedGroup, "group");
        self.close();
    }

    /// `!name` or `~name`
    fn parse_marker(&mut self) {
        self.open(SyntaxKind::Marker);
        self.advance();
        if !self.eat(SyntaxKind::Id) {
            self.report(DiagnosticKind::ExpectedMarkerName);
        }
        self.close();
    }

    fn parse_at_expression(&mut self) {
        let name = self.peek_text();
        if BUILTINS.contains(&name) {
            self.parse_leaf(SyntaxKind::Builtin);
            return;
        }

        if UNSUPPORTED_EXPRESSIONS.contains(&name) {
            let message = format!("`{name}` expressions");
            self.open(SyntaxKind::Unsupported);
            self.report_msg(DiagnosticKind::Unsupported, message);
            self.advance();
            if self.at(SyntaxKind::AngleOpen) {
                self.advance_balanced(SyntaxKind::AngleOpen, SyntaxKind::AngleClose);
            }
            self.close();
            return;
        }

        let message = name.to_string();
        self.open(SyntaxKind::Builtin);
        self.report_msg(DiagnosticKind::UnknownBuiltin, message);
        self.advance();
        self.close();
    }

    /// `@tokens { Name { ... } @precedence { ... } }`
    fn parse_tokens_block(&mut self) {
        self.open(SyntaxKind::TokensBlock);
        self.advance(); // consume '@tokens'

        if !self.at(SyntaxKind::BraceOpen) {
            self.report(DiagnosticKind::ExpectedBody);
            self.close();
            return;
        }
        self.open_block();
        self.advance(); // consume '{'

        while !self.done() && !self.at(SyntaxKind::BraceClose) {
            match self.peek() {
                SyntaxKind::Id => self.parse_rule(SyntaxKind::Rule),
                SyntaxKind::AtName => match self.peek_text() {
                    "@precedence" => self.parse_precedence(SyntaxKind::TokenPrecedence),
                    name if DECLARATIONS.contains(&name) => break,
                    "@conflict" => {
                        self.parse_unsupported_decl(
                            DiagnosticKind::Unsupported,
                            "`@conflict` declarations",
                        );
                    }
                    name => {
                        let message = name.to_string();
                        self.parse_unsupported_decl(DiagnosticKind::UnknownDeclaration, message);
                    }
                },
                _ => {
                    self.skip_with(DiagnosticKind::UnexpectedToken, "expected a token rule");
                }
            }
        }

        self.close_block(SyntaxKind::BraceClose, DiagnosticKind::UnclosedBlock, "token block");
        self.close();
    }

    /// `@skip { expr }`, optionally followed by a scoped block (unsupported).
    fn parse_skip(&mut self) {
        self.open(SyntaxKind::SkipBlock);
        self.advance(); // consume '@skip'
        self.parse_body();

        if self.at(SyntaxKind::BraceOpen) {
            self.parse_unsupported_group(
                SyntaxKind::BraceOpen,
                SyntaxKind::BraceClose,
                "scoped `@skip` blocks",
            );
        }
        self.close();
    }

    /// `@precedence { a @left, "b", c }`
    fn parse_precedence(&mut self, kind: SyntaxKind) {
        self.open(kind);
        self.advance(); // consume '@precedence'

        if !self.at(SyntaxKind::BraceOpen) {
            self.report(DiagnosticKind::ExpectedBody);
            self.close();
            return;
        }
        self.open_block();
        self.advance(); // consume '{'

        while !self.done() && !self.at(SyntaxKind::BraceClose) {
            if self.at_declaration_start() {
                break;
            }
            if self.at_any(PRECEDENCE_ENTRY) {
                let node = if self.at(SyntaxKind::Id) {
                    SyntaxKind::Ref
                } else {
                    SyntaxKind::Literal
                };
                self.parse_leaf(node);
                // associativity: @left, @right, @cut
                self.eat(SyntaxKind::AtName);
                if !self.eat(SyntaxKind::Comma)
                    && !self.at(SyntaxKind::BraceClose)
                    && !self.done()
                {
                    self.report_msg(DiagnosticKind::UnexpectedToken, "expected `,`");
                }
            } else {
                self.skip_with(
                    DiagnosticKind::UnexpectedToken,
                    "expected a name or a literal",
                );
            }
        }

        self.close_block(SyntaxKind::BraceClose, DiagnosticKind::UnclosedBlock, "precedence block");
        self.close();
    }

    /// Reports the at-name and skips its arguments, up to and including a `{ ... }` block.
    fn parse_unsupported_decl(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.open(SyntaxKind::Unsupported);
        self.report_msg(kind, message);
        self.advance();

        while !self.done() {
            match self.peek() {
                SyntaxKind::BraceOpen => {
                    self.advance_balanced(SyntaxKind::BraceOpen, SyntaxKind::BraceClose);
                    break;
                }
                SyntaxKind::AtName | SyntaxKind::BraceClose => break,
                SyntaxKind::Id if self.followed_by(SyntaxKind::BraceOpen) => break,
                _ => self.advance(),
            }
        }
        self.close();
    }

    fn parse_unsupported_group(&mut self, open: SyntaxKind, close: SyntaxKind, what: &str) {
        self.open(SyntaxKind::Unsupported);
        self.report_msg(DiagnosticKind::Unsupported, what);
        self.advance_balanced(open, close);
        self.close();
    }

    /// Consumes from `open` through its matching `close`, or to EOF.
    fn advance_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        let mut depth = 0usize;
        while !self.done() {
            let kind = self.peek();
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
    }
}
