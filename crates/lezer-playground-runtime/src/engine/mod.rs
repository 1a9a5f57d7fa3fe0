//! Specimen parser: tokenizer, Earley chart, derivation, tree assembly.
//!
//! # Recovery
//!
//! Parsing always yields a tree whose root is the top rule spanning the whole
//! specimen:
//!
//! 1. Unrecognized characters become `⚠` leaves
//! 2. Tokens the chart cannot scan are skipped and become `⚠` leaves
//! 3. If the top rule does not derive every accepted token, the longest derived
//!    prefix is kept and the rest is wrapped in one `⚠` node
//! 4. If no prefix is derived, the root holds a single `⚠` child
//!
//! Fuel exhaustion is the only failure.

mod chart;
mod derive;
mod fuel;


use std::sync::Arc;

pub use fuel::FuelLimits;

use chart::recognize;
use derive::{Child, Deriver};
use fuel::Fuel;

use crate::ParseError;
use crate::grammar::{Grammar, TokenId};
use crate::lexer::{self, HighlightSpan, Token};
use crate::tree::{NodeKind, Tree, TreeBuilder};

/// Parser for one compiled grammar. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Parser {
    grammar: Arc<Grammar>,
    limits: FuelLimits,
}

impl Parser {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self {
            grammar,
            limits: FuelLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn limits(&self) -> &FuelLimits {
        &self.limits
    }

    /// Named token spans of `text`.
    pub fn highlight(&self, text: &str) -> Vec<HighlightSpan> {
        lexer::highlight(&self.grammar, text)
    }

    pub fn parse(&self, text: &str) -> Result<Tree, ParseError> {
        let grammar = &*self.grammar;
        let tokens = lexer::tokenize(grammar, text);

        let mut input: Vec<Token> = Vec::with_capacity(tokens.len());
        let mut extras: Vec<(NodeKind, usize, usize)> = Vec::new();
        for token in tokens {
            match token.id {
                None => extras.push((NodeKind::Error, token.from, token.to)),
                Some(id) if grammar.token(id).skip => {
                    if grammar.token(id).named {
                        extras.push((NodeKind::Token(id), token.from, token.to));
                    }
                }
                Some(_) => input.push(token),
            }
        }

        let ids: Vec<TokenId> = input.iter().filter_map(|t| t.id).collect();
        let mut fuel = Fuel::new(&self.limits);
        let recognition = recognize(grammar, &ids, &mut fuel)?;

        for &index in &recognition.skipped {
            let token = input[index];
            extras.push((NodeKind::Error, token.from, token.to));
        }

        let accepted: Vec<Token> = recognition.accepted.iter().map(|&i| input[i]).collect();
        let accepted_ids: Vec<TokenId> = accepted.iter().filter_map(|t| t.id).collect();

        let mut builder = TreeBuilder::default();
        let top = grammar.top();
        let mut root = None;
        let mut parsed = 0usize;

        if let Some(prefix) = recognition.longest_prefix(grammar) {
            let mut deriver = Deriver::new(
                grammar,
                &accepted_ids,
                &recognition.completions,
                &mut fuel,
                self.limits.recursion_limit,
            );
            if let Some(node) = deriver.derive(top, 0, prefix)? {
                let nodes = std::mem::take(&mut deriver.nodes);
                let assembler = Assembler {
                    grammar,
                    tokens: &accepted,
                    derivations: &nodes,
                };
                let ids = assembler.lower(&mut builder, node);
                root = ids.first().copied();
                parsed = prefix as usize;
            }
        }

        let root = match root {
            Some(root) => root,
            None => builder.push(NodeKind::NonTerminal(top), 0, text.len()),
        };

        if parsed < accepted.len() {
            let from = accepted[parsed].from;
            let to = accepted[accepted.len() - 1].to;
            let error = builder.push(NodeKind::Error, from, to);
            builder.attach(root, vec![error]);
        } else if parsed == 0
            && !grammar.is_nullable(top)
            && !extras.iter().any(|&(kind, _, _)| kind == NodeKind::Error)
        {
            let error = builder.push(NodeKind::Error, text.len(), text.len());
            builder.attach(root, vec![error]);
        }

        builder.set_span(root, 0, text.len());

        extras.sort_by_key(|&(_, from, _)| from);
        for (kind, from, to) in extras {
            let leaf = builder.push(kind, from, to);
            builder.insert_leaf(root, leaf);
        }

        tracing::debug!(tokens = accepted.len(), parsed, "parsed specimen");

        Ok(builder.finish(self.grammar.clone(), root))
    }
}

/// Converts derivations into tree nodes, splicing unnamed nonterminals.
struct Assembler<'a> {
    grammar: &'a Grammar,
    tokens: &'a [Token],
    derivations: &'a [derive::Derivation],
}

/// A derivation whose children are being lowered.
struct Pending {
    index: usize,
    next: usize,
    children: Vec<usize>,
}

impl Pending {
    fn new(index: usize) -> Self {
        Self {
            index,
            next: 0,
            children: Vec::new(),
        }
    }
}

impl Assembler<'_> {
    /// Lowers the derivation at `index` bottom-up without recursion.
    fn lower(&self, builder: &mut TreeBuilder, index: usize) -> Vec<usize> {
        let mut stack = vec![Pending::new(index)];

        while let Some(top) = stack.last_mut() {
            let derivation = &self.derivations[top.index];
            if let Some(&child) = derivation.children.get(top.next) {
                top.next += 1;
                match child {
                    Child::Token(pos) => top.children.extend(self.leaf(builder, pos)),
                    Child::Node(node) => stack.push(Pending::new(node)),
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let ids = self.finish(builder, done);
            match stack.last_mut() {
                Some(parent) => parent.children.extend(ids),
                None => return ids,
            }
        }

        Vec::new()
    }

    fn leaf(&self, builder: &mut TreeBuilder, pos: u32) -> Option<usize> {
        let token = self.tokens[pos as usize];
        let id = token.id.filter(|&id| self.grammar.token(id).named)?;
        Some(builder.push(NodeKind::Token(id), token.from, token.to))
    }

    /// Wraps the lowered children in a node, or splices them for unnamed rules.
    fn finish(&self, builder: &mut TreeBuilder, pending: Pending) -> Vec<usize> {
        let derivation = &self.derivations[pending.index];
        if !self.grammar.nonterminal(derivation.nt).named {
            return pending.children;
        }

        let (from, to) = self.span(derivation.start as usize, derivation.end as usize);
        let id = builder.push(NodeKind::NonTerminal(derivation.nt), from, to);
        builder.attach(id, pending.children);
        vec![id]
    }

    fn span(&self, start: usize, end: usize) -> (usize, usize) {
        if start < end {
            return (self.tokens[start].from, self.tokens[end - 1].to);
        }
        let offset = match self.tokens.get(start) {
            Some(token) => token.from,
            None => self.tokens.last().map_or(0, |t| t.to),
        };
        (offset, offset)
    }
}
