//! Lowering of an analyzed grammar into runtime BNF and a token DFA.
//!
//! - Rules become nonterminals; `@top` and capitalized rules produce tree nodes
//! - `|` splits productions; `*`, `+`, `?` and nested groups become synthetic
//!   unnamed nonterminals, so the runtime only sees plain sequences
//! - Token rules referenced from rules, and literals, become runtime tokens;
//!   token rules referenced from other tokens are inlined into their regex
//!
//! Runs only on grammars without error diagnostics.

mod regex;

#[cfg(test)]
mod lower_tests;

use indexmap::IndexMap;

use lezer_playground_runtime::{Grammar, GrammarBuilder, NonTerminalId, Symbol, TokenId, TokenTable};

use crate::Error;
use crate::analyze::{DefinitionKind, Symbols};
use crate::parser::{Expr, RepeatOp};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TokenKey {
    Named(String),
    Literal(String),
}

/// Tie-break class of a token pattern; lower wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Priority {
    Declared(usize),
    Literal(usize),
    Rule(usize),
}

struct Pattern {
    token: TokenId,
    regex: String,
    priority: Priority,
}

pub fn lower(symbols: &Symbols) -> Result<Grammar, Error> {
    let mut lowering = Lowering::new(symbols);
    lowering.lower_rules()?;
    lowering.lower_skip()?;
    lowering.finish()
}

struct Lowering<'a> {
    symbols: &'a Symbols,
    builder: GrammarBuilder,
    nonterminals: IndexMap<String, NonTerminalId>,
    tokens: IndexMap<TokenKey, TokenId>,
    patterns: Vec<Pattern>,
    precedence: Vec<TokenKey>,
    synthetic: usize,
}

impl<'a> Lowering<'a> {
    fn new(symbols: &'a Symbols) -> Self {
        let precedence = symbols
            .token_precedence
            .iter()
            .filter_map(|entry| match entry {
                Expr::Ref(r) => r.name().map(|n| TokenKey::Named(n.text().to_string())),
                Expr::Literal(l) => l.value().map(TokenKey::Literal),
                _ => None,
            })
            .collect();

        Self {
            symbols,
            builder: GrammarBuilder::new(),
            nonterminals: IndexMap::new(),
            tokens: IndexMap::new(),
            patterns: Vec::new(),
            precedence,
            synthetic: 0,
        }
    }

    fn lower_rules(&mut self) -> Result<(), Error> {
        let symbols = self.symbols;
        for (name, definition) in symbols.rules() {
            let named = definition.is_top || is_capitalized(name);
            let id = self.builder.add_nonterminal(name, named);
            self.nonterminals.insert(name.to_string(), id);
        }

        for (name, definition) in symbols.rules() {
            let id = self.nonterminals[name];
            let expr = definition.body.as_ref().and_then(|b| b.expr());
            self.synthetic = 0;
            for rhs in self.alternatives(expr.as_ref(), name)? {
                self.builder.add_production(id, rhs);
            }
        }
        Ok(())
    }

    fn lower_skip(&mut self) -> Result<(), Error> {
        let mut skipped = Vec::new();
        for expr in &self.symbols.skip {
            collect_skip(expr, &mut skipped);
        }
        for expr in skipped {
            if let Some(Symbol::Token(id)) = self.symbol(&expr, "@skip")? {
                self.builder.mark_skip(id);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Grammar, Error> {
        let top = self
            .symbols
            .top
            .as_ref()
            .and_then(|name| self.nonterminals.get(name))
            .copied()
            .ok_or_else(|| Error::Lower("grammar has no top rule".to_string()))?;

        let mut patterns = self.patterns;
        patterns.sort_by_key(|p| p.priority);

        let table = if patterns.is_empty() {
            None
        } else {
            let regexes: Vec<String> = patterns.iter().map(|p| p.regex.clone()).collect();
            let dfa = regex::build_dfa(&regexes)?;
            Some(TokenTable::new(dfa, patterns.iter().map(|p| p.token).collect()))
        };

        tracing::debug!(
            tokens = self.builder.token_count(),
            nonterminals = self.builder.nonterminal_count(),
            "lowered grammar"
        );
        Ok(self.builder.build(top, table))
    }

    /// Productions for `expr` in rule context. An absent expression is a single empty production.
    fn alternatives(&mut self, expr: Option<&Expr>, owner: &str) -> Result<Vec<Vec<Symbol>>, Error> {
        let Some(expr) = expr else {
            return Ok(vec![Vec::new()]);
        };

        match expr {
            Expr::Choice(choice) => {
                let mut productions = Vec::new();
                for alt in choice.alternatives() {
                    productions.extend(self.alternatives(Some(&alt), owner)?);
                }
                Ok(productions)
            }
            Expr::Seq(seq) => {
                let mut rhs = Vec::new();
                for item in seq.items() {
                    rhs.extend(self.symbol(&item, owner)?);
                }
                Ok(vec![rhs])
            }
            Expr::Group(group) => self.alternatives(group.inner().as_ref(), owner),
            other => Ok(vec![self.symbol(other, owner)?.into_iter().collect()]),
        }
    }

    /// Single symbol standing for `expr`; `None` when it matches nothing (markers, `""`).
    fn symbol(&mut self, expr: &Expr, owner: &str) -> Result<Option<Symbol>, Error> {
        let symbol = match expr {
            Expr::Ref(r) => {
                let Some(name) = r.name() else { return Ok(None) };
                let name = name.text();
                match self.nonterminals.get(name) {
                    Some(&id) => Some(Symbol::NonTerminal(id)),
                    None => Some(Symbol::Token(self.named_token(name)?)),
                }
            }
            Expr::Literal(literal) => match literal.value() {
                Some(value) if !value.is_empty() => Some(Symbol::Token(self.literal_token(value))),
                _ => None,
            },
            Expr::Group(group) => match group.inner() {
                Some(inner @ (Expr::Choice(_) | Expr::Seq(_))) => {
                    let productions = self.alternatives(Some(&inner), owner)?;
                    Some(self.synthetic_rule(owner, productions))
                }
                Some(inner) => self.symbol(&inner, owner)?,
                None => None,
            },
            Expr::Choice(_) | Expr::Seq(_) => {
                let productions = self.alternatives(Some(expr), owner)?;
                Some(self.synthetic_rule(owner, productions))
            }
            Expr::Repeat(repeat) => {
                let inner = match repeat.inner() {
                    Some(inner) => self.symbol(&inner, owner)?,
                    None => None,
                };
                let Some(inner) = inner else { return Ok(None) };
                let id = self.synthetic_nonterminal(owner);
                let this = Symbol::NonTerminal(id);
                match repeat.op() {
                    Some(RepeatOp::ZeroOrMore) => {
                        self.builder.add_production(id, Vec::new());
                        self.builder.add_production(id, vec![this, inner]);
                    }
                    Some(RepeatOp::OneOrMore) => {
                        self.builder.add_production(id, vec![inner]);
                        self.builder.add_production(id, vec![this, inner]);
                    }
                    Some(RepeatOp::Optional) | None => {
                        self.builder.add_production(id, Vec::new());
                        self.builder.add_production(id, vec![inner]);
                    }
                }
                Some(this)
            }
            Expr::CharSet(_)
            | Expr::AnyChar(_)
            | Expr::Builtin(_)
            | Expr::Marker(_)
            | Expr::Unsupported(_) => None,
        };
        Ok(symbol)
    }

    fn synthetic_nonterminal(&mut self, owner: &str) -> NonTerminalId {
        self.synthetic += 1;
        self.builder
            .add_nonterminal(format!("{owner}/{}", self.synthetic), false)
    }

    fn synthetic_rule(&mut self, owner: &str, productions: Vec<Vec<Symbol>>) -> Symbol {
        let id = self.synthetic_nonterminal(owner);
        for rhs in productions {
            self.builder.add_production(id, rhs);
        }
        Symbol::NonTerminal(id)
    }

    fn named_token(&mut self, name: &str) -> Result<TokenId, Error> {
        let key = TokenKey::Named(name.to_string());
        if let Some(&id) = self.tokens.get(&key) {
            return Ok(id);
        }

        let symbols = self.symbols;
        let Some((index, _, definition)) = symbols.definitions.get_full(name) else {
            return Err(Error::Lower(format!("`{name}` is not defined")));
        };
        let declared = symbols
            .tokens()
            .position(|(n, _)| n == name)
            .unwrap_or(index);

        let mut stack = Vec::new();
        let body = definition.body.as_ref().and_then(|b| b.expr());
        let regex = match &body {
            Some(expr) => self.token_regex(expr, &mut stack)?,
            None => String::new(),
        };

        let id = self.builder.add_token(name, is_capitalized(name));
        let priority = self.priority(&key, Priority::Rule(declared));
        self.tokens.insert(key, id);
        self.patterns.push(Pattern {
            token: id,
            regex,
            priority,
        });
        Ok(id)
    }

    fn literal_token(&mut self, value: String) -> TokenId {
        let key = TokenKey::Literal(value.clone());
        if let Some(&id) = self.tokens.get(&key) {
            return id;
        }

        let id = self.builder.add_token(format!("{value:?}"), false);
        let literal_count = self
            .tokens
            .keys()
            .filter(|k| matches!(k, TokenKey::Literal(_)))
            .count();
        let priority = self.priority(&key, Priority::Literal(literal_count));
        self.patterns.push(Pattern {
            token: id,
            regex: regex::escape_literal(&value),
            priority,
        });
        self.tokens.insert(key, id);
        id
    }

    fn priority(&self, key: &TokenKey, fallback: Priority) -> Priority {
        match self.precedence.iter().position(|k| k == key) {
            Some(index) => Priority::Declared(index),
            None => fallback,
        }
    }

    /// Regex for a token-context expression. `stack` holds the token rules being inlined.
    fn token_regex(&self, expr: &Expr, stack: &mut Vec<String>) -> Result<String, Error> {
        let regex = match expr {
            Expr::Choice(choice) => {
                let alts = choice
                    .alternatives()
                    .map(|alt| self.token_regex(&alt, stack))
                    .collect::<Result<Vec<_>, _>>()?;
                regex::group(&alts.join("|"))
            }
            Expr::Seq(seq) => {
                let mut out = String::new();
                for item in seq.items() {
                    out.push_str(&regex::group(&self.token_regex(&item, stack)?));
                }
                out
            }
            Expr::Repeat(repeat) => {
                let inner = match repeat.inner() {
                    Some(inner) => self.token_regex(&inner, stack)?,
                    None => String::new(),
                };
                let op = match repeat.op() {
                    Some(RepeatOp::ZeroOrMore) => "*",
                    Some(RepeatOp::OneOrMore) => "+",
                    Some(RepeatOp::Optional) | None => "?",
                };
                format!("{}{op}", regex::group(&inner))
            }
            Expr::Group(group) => match group.inner() {
                Some(inner) => regex::group(&self.token_regex(&inner, stack)?),
                None => String::new(),
            },
            Expr::Ref(r) => {
                let Some(name) = r.name() else {
                    return Ok(String::new());
                };
                let name = name.text();
                if stack.iter().any(|n| n == name) {
                    return Err(Error::Lower(format!("token `{name}` refers to itself")));
                }
                let Some(definition) = self.symbols.get(name) else {
                    return Err(Error::Lower(format!("`{name}` is not defined")));
                };
                if definition.kind != DefinitionKind::Token {
                    return Err(Error::Lower(format!("`{name}` is not a token")));
                }
                let Some(body) = definition.body.as_ref().and_then(|b| b.expr()) else {
                    return Ok(String::new());
                };
                stack.push(name.to_string());
                let inner = self.token_regex(&body, stack)?;
                stack.pop();
                regex::group(&inner)
            }
            Expr::Literal(literal) => regex::escape_literal(&literal.value().unwrap_or_default()),
            Expr::CharSet(set) => regex::char_set(set),
            Expr::AnyChar(_) => "(?s:.)".to_string(),
            Expr::Builtin(builtin) => match builtin.name() {
                Some(name) => regex::builtin(name.text()).to_string(),
                None => String::new(),
            },
            Expr::Marker(_) | Expr::Unsupported(_) => String::new(),
        };
        Ok(regex)
    }
}

/// Flattens `a | (b | c)` into its alternatives.
fn collect_skip(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Choice(choice) => {
            for alt in choice.alternatives() {
                collect_skip(&alt, out);
            }
        }
        Expr::Group(group) => {
            if let Some(inner) = group.inner() {
                collect_skip(&inner, out);
            }
        }
        other => out.push(other.clone()),
    }
}

fn is_capitalized(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
