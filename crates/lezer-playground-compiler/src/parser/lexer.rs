//! Lexer for the grammar language.
//!
//! Tokens are kind plus span; text is sliced from the source on demand.
//! A run of characters no token matches becomes a single `Garbage` token.

use logos::Logos;
use rowan::{TextRange, TextSize};

use super::cst::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for (result, range) in SyntaxKind::lexer(source).spanned() {
        let span = TextRange::new(offset(range.start), offset(range.end));
        let kind = result.unwrap_or(SyntaxKind::Garbage);

        match tokens.last_mut() {
            Some(prev)
                if kind == SyntaxKind::Garbage
                    && prev.kind == SyntaxKind::Garbage
                    && prev.span.end() == span.start() =>
            {
                prev.span = prev.span.cover(span);
            }
            _ => tokens.push(Token { kind, span }),
        }
    }

    tokens
}

#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[token.span]
}

fn offset(at: usize) -> TextSize {
    TextSize::from(at as u32)
}
