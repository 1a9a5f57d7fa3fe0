//! Runtime for parsing specimens with a compiled grammar.
//!
//! The compiler lowers grammar text into a [`Grammar`]: BNF productions over
//! token and nonterminal symbols plus a [`TokenTable`] DFA. A [`Parser`] wraps a
//! shared grammar and turns specimen text into a [`Tree`].
//!
//! Parsing never fails on malformed specimens. Unrecognized characters and
//! tokens that do not fit the grammar end up in `⚠` error nodes. Only fuel
//! exhaustion is reported as an [`Error`](ParseError).

pub mod engine;
pub mod grammar;
pub mod lexer;
pub mod tree;

mod error;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod test_utils;

pub use engine::{FuelLimits, Parser};
pub use error::ParseError;
pub use grammar::{
    Grammar, GrammarBuilder, NonTerminal, NonTerminalId, Production, Symbol, TokenDef, TokenId,
    TokenTable,
};
pub use lexer::{HighlightSpan, Token};
pub use tree::{NodeKind, NodeRef, Tree, Visitor};

/// Node name used for error recovery regions.
pub const ERROR_NODE_NAME: &str = "⚠";
