//! Specimen tokenizer.
//!
//! Produces span-based tokens using the grammar's [`TokenTable`](crate::TokenTable).
//!
//! ## Error handling
//!
//! Characters no token matches are coalesced into a single error token
//! (`id: None`) per run, rather than one error per character.

use crate::grammar::{Grammar, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// `None` for unrecognized input.
    pub id: Option<TokenId>,
    pub from: usize,
    pub to: usize,
}

impl Token {
    pub fn is_error(&self) -> bool {
        self.id.is_none()
    }
}

/// A named token span, for syntax highlighting of the specimen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub name: String,
    pub from: usize,
    pub to: usize,
}

/// Tokenizes `text` by repeated longest match.
pub fn tokenize(grammar: &Grammar, text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut error_start: Option<usize> = None;

    while pos < text.len() {
        let matched = grammar
            .token_table()
            .and_then(|table| table.longest_match(text, pos));

        match matched {
            Some((id, end)) => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token {
                        id: None,
                        from: start,
                        to: pos,
                    });
                }
                tokens.push(Token {
                    id: Some(id),
                    from: pos,
                    to: end,
                });
                pos = end;
            }
            None => {
                if error_start.is_none() {
                    error_start = Some(pos);
                }
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if let Some(start) = error_start {
        tokens.push(Token {
            id: None,
            from: start,
            to: text.len(),
        });
    }

    tracing::trace!(count = tokens.len(), "tokenized specimen");
    tokens
}

/// Spans of named tokens, including named skip tokens such as comments.
pub fn highlight(grammar: &Grammar, text: &str) -> Vec<HighlightSpan> {
    tokenize(grammar, text)
        .into_iter()
        .filter_map(|token| {
            let def = grammar.token(token.id?);
            def.named.then(|| HighlightSpan {
                name: def.name.clone(),
                from: token.from,
                to: token.to,
            })
        })
        .collect()
}
