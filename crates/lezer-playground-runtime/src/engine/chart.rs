//! Earley recognizer.
//!
//! Nullable nonterminals are handled by advancing over them at prediction time
//! (Aycock & Horspool), so completions never need to revisit the current set.
//!
//! Tokens that cannot be scanned from the current set are skipped and reported
//! back; the chart stays at the same set and tries the next token.

use std::collections::{HashMap, HashSet};

use super::fuel::Fuel;
use crate::ParseError;
use crate::grammar::{Grammar, NonTerminalId, Symbol, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Item {
    production: u32,
    dot: u32,
    origin: u32,
}

impl Item {
    fn advance(self) -> Self {
        Self {
            dot: self.dot + 1,
            ..self
        }
    }
}

#[derive(Debug, Default)]
struct EarleySet {
    items: Vec<Item>,
    seen: HashSet<Item>,
}

impl EarleySet {
    fn insert(&mut self, item: Item) -> bool {
        if !self.seen.insert(item) {
            return false;
        }
        self.items.push(item);
        true
    }
}

/// Completed derivations recorded while building the chart.
#[derive(Debug, Default)]
pub(crate) struct Completions {
    ends: HashMap<(NonTerminalId, u32), Vec<u32>>,
    spans: HashSet<(u32, u32, u32)>,
}

impl Completions {
    fn record(&mut self, lhs: NonTerminalId, production: u32, start: u32, end: u32) {
        if self.spans.insert((production, start, end)) {
            // Sets close in order, so ends arrive ascending.
            let ends = self.ends.entry((lhs, start)).or_default();
            if ends.last() != Some(&end) {
                ends.push(end);
            }
        }
    }

    /// Whether `production` derives the accepted tokens `start..end`.
    pub(crate) fn contains(&self, production: u32, start: u32, end: u32) -> bool {
        self.spans.contains(&(production, start, end))
    }

    /// End positions of completed derivations of `nt` starting at `start`, ascending.
    pub(crate) fn ends(&self, nt: NonTerminalId, start: u32) -> &[u32] {
        self.ends.get(&(nt, start)).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug)]
pub(crate) struct Recognition {
    /// Indices into the input of tokens the chart consumed.
    pub accepted: Vec<usize>,
    /// Indices into the input of tokens that could not be scanned.
    pub skipped: Vec<usize>,
    pub completions: Completions,
}

impl Recognition {
    /// Largest number of accepted tokens the top rule derives, if any.
    pub(crate) fn longest_prefix(&self, grammar: &Grammar) -> Option<u32> {
        let top = grammar.top();
        self.completions.ends(top, 0).iter().copied().max()
    }
}

struct Chart<'g> {
    grammar: &'g Grammar,
    sets: Vec<EarleySet>,
    completions: Completions,
}

pub(crate) fn recognize(
    grammar: &Grammar,
    input: &[TokenId],
    fuel: &mut Fuel,
) -> Result<Recognition, ParseError> {
    let mut chart = Chart {
        grammar,
        sets: Vec::with_capacity(input.len() + 1),
        completions: Completions::default(),
    };

    let mut first = EarleySet::default();
    for &production in grammar.productions_of(grammar.top()) {
        fuel.consume()?;
        first.insert(Item {
            production,
            dot: 0,
            origin: 0,
        });
    }
    chart.sets.push(first);
    chart.close(0, fuel)?;

    let mut accepted = Vec::with_capacity(input.len());
    let mut skipped = Vec::new();

    for (index, &token) in input.iter().enumerate() {
        let current = chart.sets.len() - 1;
        let next = chart.scan(current, token, fuel)?;
        if next.items.is_empty() {
            skipped.push(index);
            continue;
        }
        chart.sets.push(next);
        chart.close(current + 1, fuel)?;
        accepted.push(index);
    }

    tracing::trace!(
        sets = chart.sets.len(),
        accepted = accepted.len(),
        skipped = skipped.len(),
        "recognized specimen"
    );

    Ok(Recognition {
        accepted,
        skipped,
        completions: chart.completions,
    })
}

impl Chart<'_> {
    fn next_symbol(&self, item: Item) -> Option<Symbol> {
        self.grammar
            .production(item.production)
            .rhs
            .get(item.dot as usize)
            .copied()
    }

    fn scan(&self, set: usize, token: TokenId, fuel: &mut Fuel) -> Result<EarleySet, ParseError> {
        let mut next = EarleySet::default();
        for &item in &self.sets[set].items {
            if self.next_symbol(item) == Some(Symbol::Token(token)) {
                fuel.consume()?;
                next.insert(item.advance());
            }
        }
        Ok(next)
    }

    fn add(&mut self, set: usize, item: Item, fuel: &mut Fuel) -> Result<(), ParseError> {
        if self.sets[set].insert(item) {
            fuel.consume()?;
        }
        Ok(())
    }

    fn close(&mut self, set: usize, fuel: &mut Fuel) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let mut cursor = 0;

        while let Some(&item) = self.sets[set].items.get(cursor) {
            cursor += 1;

            match self.next_symbol(item) {
                Some(Symbol::NonTerminal(nt)) => {
                    for &production in grammar.productions_of(nt) {
                        let predicted = Item {
                            production,
                            dot: 0,
                            origin: set as u32,
                        };
                        self.add(set, predicted, fuel)?;
                    }
                    if grammar.is_nullable(nt) {
                        self.add(set, item.advance(), fuel)?;
                    }
                }
                Some(Symbol::Token(_)) => {}
                None => {
                    let lhs = grammar.production(item.production).lhs;
                    self.completions
                        .record(lhs, item.production, item.origin, set as u32);

                    let origin = item.origin as usize;
                    if origin == set {
                        // Empty derivation: waiting items were advanced at prediction.
                        continue;
                    }
                    let waiting: Vec<Item> = self.sets[origin]
                        .items
                        .iter()
                        .copied()
                        .filter(|&w| self.next_symbol(w) == Some(Symbol::NonTerminal(lhs)))
                        .collect();
                    for w in waiting {
                        self.add(set, w.advance(), fuel)?;
                    }
                }
            }
        }

        Ok(())
    }
}
