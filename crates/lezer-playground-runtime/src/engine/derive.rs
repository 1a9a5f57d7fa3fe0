//! Derivation reconstruction from recorded completions.
//!
//! Alternatives are tried in declaration order and nonterminal spans longest
//! first, which picks one derivation for ambiguous input deterministically.
//!
//! The search runs on an explicit stack of frames, one per nonterminal span
//! being derived, so deep nesting and long repetitions cost heap, not call
//! stack. Only named nonterminals count toward the recursion limit; unnamed
//! ones (repetition helpers, lowercase rules) are spliced away and never add
//! a level to the tree.

use std::collections::{HashMap, HashSet};

use super::chart::Completions;
use super::fuel::Fuel;
use crate::ParseError;
use crate::grammar::{Grammar, NonTerminalId, Symbol, TokenId};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Child {
    /// Accepted token position.
    Token(u32),
    /// Index into [`Deriver::nodes`].
    Node(usize),
}

#[derive(Debug)]
pub(crate) struct Derivation {
    pub nt: NonTerminalId,
    pub start: u32,
    pub end: u32,
    pub children: Vec<Child>,
}

type Key = (NonTerminalId, u32, u32);

/// One right-hand-side symbol being matched.
#[derive(Debug, Clone, Copy)]
struct Step {
    /// Position where the symbol starts.
    pos: u32,
    /// Set for nonterminal symbols, which may be retried with a shorter span.
    nt: Option<NonTerminalId>,
    /// Candidate ends already tried, counted from the longest.
    tried: usize,
}

/// A nonterminal span under derivation.
///
/// `steps` and `children` run in parallel; a step without a child is pending,
/// waiting for its next candidate span.
#[derive(Debug)]
struct Frame {
    key: Key,
    named: bool,
    cycle_hits: u32,
    /// Index into the productions of `key.0`.
    alternative: usize,
    steps: Vec<Step>,
    children: Vec<Child>,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    /// Match the symbol after the last matched one.
    Advance,
    /// Try the next candidate span of the pending step.
    Retry,
    /// Undo the last matched symbol.
    Backtrack,
}

enum Outcome {
    /// A child span must be derived before the frame can go on.
    Descend(Key),
    Matched,
    Failed,
}

enum Lookup {
    Known(Option<usize>),
    Opened,
}

pub(crate) struct Deriver<'a> {
    grammar: &'a Grammar,
    tokens: &'a [TokenId],
    completions: &'a Completions,
    fuel: &'a mut Fuel,
    depth: u32,
    recursion_limit: u32,
    pub nodes: Vec<Derivation>,
    memo: HashMap<Key, Option<usize>>,
    active: HashSet<Key>,
    cycle_hits: u32,
}

impl<'a> Deriver<'a> {
    pub(crate) fn new(
        grammar: &'a Grammar,
        tokens: &'a [TokenId],
        completions: &'a Completions,
        fuel: &'a mut Fuel,
        recursion_limit: u32,
    ) -> Self {
        Self {
            grammar,
            tokens,
            completions,
            fuel,
            depth: 0,
            recursion_limit,
            nodes: Vec::new(),
            memo: HashMap::new(),
            active: HashSet::new(),
            cycle_hits: 0,
        }
    }

    pub(crate) fn derive(
        &mut self,
        nt: NonTerminalId,
        start: u32,
        end: u32,
    ) -> Result<Option<usize>, ParseError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut action = match self.open((nt, start, end), &mut stack)? {
            Lookup::Known(result) => return Ok(result),
            Lookup::Opened => Action::Advance,
        };

        while let Some(frame) = stack.last_mut() {
            match self.resume(frame, action)? {
                Outcome::Descend(key) => {
                    action = match self.open(key, &mut stack)? {
                        Lookup::Opened => Action::Advance,
                        Lookup::Known(result) => accept(&mut stack, result),
                    };
                }
                outcome => {
                    let Some(frame) = stack.pop() else { break };
                    let result = self.close(frame, matches!(outcome, Outcome::Matched));
                    if stack.is_empty() {
                        return Ok(result);
                    }
                    action = accept(&mut stack, result);
                }
            }
        }

        Ok(None)
    }

    /// Answers `key` from the memo or the cycle guard, or pushes a frame for it.
    fn open(&mut self, key: Key, stack: &mut Vec<Frame>) -> Result<Lookup, ParseError> {
        if let Some(&cached) = self.memo.get(&key) {
            return Ok(Lookup::Known(cached));
        }
        if self.active.contains(&key) {
            self.cycle_hits += 1;
            return Ok(Lookup::Known(None));
        }

        let named = self.grammar.nonterminal(key.0).named;
        if named {
            if self.depth >= self.recursion_limit {
                return Err(ParseError::RecursionLimitExceeded);
            }
            self.depth += 1;
        }
        self.active.insert(key);
        stack.push(Frame {
            key,
            named,
            cycle_hits: self.cycle_hits,
            alternative: 0,
            steps: Vec::new(),
            children: Vec::new(),
        });
        Ok(Lookup::Opened)
    }

    fn close(&mut self, frame: Frame, matched: bool) -> Option<usize> {
        let (nt, start, end) = frame.key;
        let result = matched.then(|| {
            self.nodes.push(Derivation {
                nt,
                start,
                end,
                children: frame.children,
            });
            self.nodes.len() - 1
        });

        self.active.remove(&frame.key);
        if frame.named {
            self.depth -= 1;
        }
        // A failure caused by the cycle guard may succeed from another context.
        if result.is_some() || self.cycle_hits == frame.cycle_hits {
            self.memo.insert(frame.key, result);
        }
        result
    }

    /// Runs `frame` until it needs a child span or has no alternatives left.
    fn resume(&mut self, frame: &mut Frame, mut action: Action) -> Result<Outcome, ParseError> {
        let (nt, start, end) = frame.key;
        let productions = self.grammar.productions_of(nt);

        loop {
            self.fuel.consume()?;

            action = match action {
                Action::Advance => {
                    let Some(&production) = productions.get(frame.alternative) else {
                        return Ok(Outcome::Failed);
                    };
                    if frame.steps.is_empty() && !self.completions.contains(production, start, end)
                    {
                        frame.alternative += 1;
                        continue;
                    }

                    let pos = frame.children.last().map_or(start, |&c| self.end_of(c));
                    match self.grammar.production(production).rhs.get(frame.steps.len()) {
                        None if pos == end => return Ok(Outcome::Matched),
                        None => Action::Backtrack,
                        Some(&Symbol::Token(token)) => {
                            if pos < end && self.tokens[pos as usize] == token {
                                frame.steps.push(Step {
                                    pos,
                                    nt: None,
                                    tried: 0,
                                });
                                frame.children.push(Child::Token(pos));
                                Action::Advance
                            } else {
                                Action::Backtrack
                            }
                        }
                        Some(&Symbol::NonTerminal(child)) => {
                            frame.steps.push(Step {
                                pos,
                                nt: Some(child),
                                tried: 0,
                            });
                            Action::Retry
                        }
                    }
                }
                Action::Retry => {
                    let Some(step) = frame.steps.last_mut() else {
                        return Ok(Outcome::Failed);
                    };
                    let candidate = step.nt.and_then(|child| {
                        let ends = self.completions.ends(child, step.pos);
                        let within = ends.partition_point(|&e| e <= end);
                        within
                            .checked_sub(step.tried + 1)
                            .map(|i| (child, ends[i]))
                    });
                    match candidate {
                        Some((child, child_end)) => {
                            step.tried += 1;
                            return Ok(Outcome::Descend((child, step.pos, child_end)));
                        }
                        None => {
                            frame.steps.pop();
                            Action::Backtrack
                        }
                    }
                }
                Action::Backtrack => {
                    if frame.children.pop().is_some() {
                        Action::Retry
                    } else {
                        frame.steps.clear();
                        frame.alternative += 1;
                        Action::Advance
                    }
                }
            };
        }
    }

    fn end_of(&self, child: Child) -> u32 {
        match child {
            Child::Token(pos) => pos + 1,
            Child::Node(node) => self.nodes[node].end,
        }
    }
}

/// Hands a derived child span to the frame that asked for it.
fn accept(stack: &mut [Frame], result: Option<usize>) -> Action {
    match (result, stack.last_mut()) {
        (Some(node), Some(frame)) => {
            frame.children.push(Child::Node(node));
            Action::Advance
        }
        _ => Action::Retry,
    }
}
