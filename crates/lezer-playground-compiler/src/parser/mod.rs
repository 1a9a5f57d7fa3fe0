//! Front end for the Lezer grammar language: lexer, lossless rowan CST, typed AST.
//!
//! Parsing always yields a complete tree. Input that does not fit ends up in
//! `Error` nodes and a diagnostic is recorded; comments and whitespace are kept
//! as trivia. A `{` left open is closed early when the next `Name {` or a
//! declaration keyword shows up, so one missing brace does not swallow the rest
//! of the file.
//!
//! Only fuel exhaustion aborts, see [`crate::Error`].

pub mod ast;
pub mod cst;
pub mod lexer;
pub mod unescape;

mod core;
mod grammar;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod unescape_tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{
    AnyChar, Body, Builtin, CharSet, Choice, Directive, Expr, Group, Item, Literal, Marker,
    Precedence, Ref, Repeat, RepeatOp, Root, Rule, Seq, SkipBlock, TokenPrecedence, TokensBlock,
    TopRule, Unsupported,
};

pub use core::Parser;

use crate::PassResult;
use lexer::lex;

/// Green tree of one grammar source.
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn root(&self) -> Root {
        Root::cast(self.syntax()).expect("parser always produces Root")
    }
}

/// Parses with no fuel limits.
pub fn parse(source: &str) -> PassResult<Parse> {
    parse_with_parser(Parser::new(source, lex(source)))
}

pub(crate) fn parse_with_parser(mut parser: Parser) -> PassResult<Parse> {
    parser.parse_root();
    let (green, diagnostics) = parser.finish()?;
    Ok((Parse { green }, diagnostics))
}
