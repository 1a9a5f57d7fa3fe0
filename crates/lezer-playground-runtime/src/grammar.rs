//! Compiled grammar representation.
//!
//! Productions are plain BNF: every EBNF operator has already been lowered to
//! synthetic nonterminals by the compiler. A nonterminal or token is *named*
//! when it appears as a node in the output tree.

use std::fmt::Write;

use regex_automata::dfa::{Automaton, dense};
use regex_automata::{Anchored, Input};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerminalId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Token(TokenId),
    NonTerminal(NonTerminalId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDef {
    pub name: String,
    /// Appears as a leaf node in the tree.
    pub named: bool,
    /// Matched by the `@skip` expression; never fed to the parser.
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub name: String,
    /// Produces a tree node. Unnamed nonterminals splice their children into the parent.
    pub named: bool,
    pub(crate) productions: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: NonTerminalId,
    pub rhs: Vec<Symbol>,
}

/// Anchored multi-pattern DFA recognizing every token of a grammar.
///
/// Pattern `i` recognizes token `patterns[i]`. Lower pattern indices win ties
/// between matches of equal length.
#[derive(Debug, Clone)]
pub struct TokenTable {
    dfa: dense::DFA<Vec<u32>>,
    patterns: Vec<TokenId>,
}

impl TokenTable {
    pub fn new(dfa: dense::DFA<Vec<u32>>, patterns: Vec<TokenId>) -> Self {
        Self { dfa, patterns }
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Longest non-empty token match starting at `pos`, as `(token, end)`.
    pub fn longest_match(&self, text: &str, pos: usize) -> Option<(TokenId, usize)> {
        let input = Input::new(text).range(pos..).anchored(Anchored::Yes);
        let mut state = self.dfa.start_state_forward(&input).ok()?;
        let mut best: Option<(usize, usize)> = None;
        let bytes = text.as_bytes();

        // Match states are delayed by one byte: entering a match state after
        // consuming byte `i` reports a match ending at `i`.
        let mut dead = false;
        for (i, &b) in bytes[pos..].iter().enumerate() {
            state = self.dfa.next_state(state, b);
            if self.dfa.is_special_state(state) {
                if self.dfa.is_match_state(state) {
                    best = Some((self.min_pattern(state), pos + i));
                } else if self.dfa.is_dead_state(state) || self.dfa.is_quit_state(state) {
                    dead = true;
                    break;
                }
            }
        }
        if !dead {
            state = self.dfa.next_eoi_state(state);
            if self.dfa.is_match_state(state) {
                best = Some((self.min_pattern(state), bytes.len()));
            }
        }

        let (pattern, end) = best?;
        if end == pos {
            return None;
        }
        Some((self.patterns[pattern], end))
    }

    fn min_pattern(&self, state: regex_automata::util::primitives::StateID) -> usize {
        (0..self.dfa.match_len(state))
            .map(|i| self.dfa.match_pattern(state, i).as_usize())
            .min()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    tokens: Vec<TokenDef>,
    nonterminals: Vec<NonTerminal>,
    productions: Vec<Production>,
    top: NonTerminalId,
    nullable: Vec<bool>,
    token_table: Option<TokenTable>,
}

impl Grammar {
    pub fn top(&self) -> NonTerminalId {
        self.top
    }

    pub fn token(&self, id: TokenId) -> &TokenDef {
        &self.tokens[id.0 as usize]
    }

    pub fn tokens(&self) -> &[TokenDef] {
        &self.tokens
    }

    pub fn nonterminal(&self, id: NonTerminalId) -> &NonTerminal {
        &self.nonterminals[id.0 as usize]
    }

    pub fn nonterminals(&self) -> &[NonTerminal] {
        &self.nonterminals
    }

    pub fn production(&self, index: u32) -> &Production {
        &self.productions[index as usize]
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Production indices for `id`, in declaration order.
    pub fn productions_of(&self, id: NonTerminalId) -> &[u32] {
        &self.nonterminals[id.0 as usize].productions
    }

    pub fn is_nullable(&self, id: NonTerminalId) -> bool {
        self.nullable[id.0 as usize]
    }

    pub fn token_table(&self) -> Option<&TokenTable> {
        self.token_table.as_ref()
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Token(t) => &self.token(t).name,
            Symbol::NonTerminal(n) => &self.nonterminal(n).name,
        }
    }

    /// BNF listing, one production per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "@top {}", self.nonterminal(self.top).name);
        for production in &self.productions {
            let _ = write!(out, "{} :=", self.nonterminal(production.lhs).name);
            if production.rhs.is_empty() {
                out.push_str(" ε");
            }
            for &symbol in &production.rhs {
                out.push(' ');
                out.push_str(self.symbol_name(symbol));
            }
            out.push('\n');
        }
        let skipped: Vec<&str> = self
            .tokens
            .iter()
            .filter(|t| t.skip)
            .map(|t| t.name.as_str())
            .collect();
        if !skipped.is_empty() {
            let _ = writeln!(out, "@skip {}", skipped.join(" "));
        }
        out
    }
}

/// Incremental construction of a [`Grammar`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    tokens: Vec<TokenDef>,
    nonterminals: Vec<NonTerminal>,
    productions: Vec<Production>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_token(&mut self, name: impl Into<String>, named: bool) -> TokenId {
        let id = TokenId(self.tokens.len() as u16);
        self.tokens.push(TokenDef {
            name: name.into(),
            named,
            skip: false,
        });
        id
    }

    pub fn mark_skip(&mut self, id: TokenId) {
        self.tokens[id.0 as usize].skip = true;
    }

    pub fn add_nonterminal(&mut self, name: impl Into<String>, named: bool) -> NonTerminalId {
        let id = NonTerminalId(self.nonterminals.len() as u16);
        self.nonterminals.push(NonTerminal {
            name: name.into(),
            named,
            productions: Vec::new(),
        });
        id
    }

    pub fn add_production(&mut self, lhs: NonTerminalId, rhs: Vec<Symbol>) {
        let index = self.productions.len() as u32;
        self.nonterminals[lhs.0 as usize].productions.push(index);
        self.productions.push(Production { lhs, rhs });
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn build(self, top: NonTerminalId, token_table: Option<TokenTable>) -> Grammar {
        let nullable = compute_nullable(&self.nonterminals, &self.productions);
        Grammar {
            tokens: self.tokens,
            nonterminals: self.nonterminals,
            productions: self.productions,
            top,
            nullable,
            token_table,
        }
    }
}

fn compute_nullable(nonterminals: &[NonTerminal], productions: &[Production]) -> Vec<bool> {
    let mut nullable = vec![false; nonterminals.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for production in productions {
            let lhs = production.lhs.0 as usize;
            if nullable[lhs] {
                continue;
            }
            let all_nullable = production.rhs.iter().all(|symbol| match symbol {
                Symbol::Token(_) => false,
                Symbol::NonTerminal(n) => nullable[n.0 as usize],
            });
            if all_nullable {
                nullable[lhs] = true;
                changed = true;
            }
        }
    }
    nullable
}
