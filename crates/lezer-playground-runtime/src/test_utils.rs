//! Hand-built grammars for runtime tests.

use std::sync::Arc;

use regex_automata::MatchKind;
use regex_automata::dfa::{StartKind, dense};

use crate::grammar::{Grammar, GrammarBuilder, NonTerminalId, Symbol, TokenId, TokenTable};

#[derive(Default)]
pub(crate) struct TestGrammar {
    builder: GrammarBuilder,
    patterns: Vec<(String, TokenId)>,
}

impl TestGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&mut self, name: &str, pattern: &str, named: bool) -> Symbol {
        let id = self.builder.add_token(name, named);
        self.patterns.push((pattern.to_string(), id));
        Symbol::Token(id)
    }

    pub fn literal(&mut self, text: &str) -> Symbol {
        let pattern = regex_syntax::escape(text);
        self.token(&format!("{text:?}"), &pattern, false)
    }

    pub fn skip(&mut self, name: &str, pattern: &str, named: bool) {
        let Symbol::Token(id) = self.token(name, pattern, named) else {
            unreachable!()
        };
        self.builder.mark_skip(id);
    }

    pub fn nt(&mut self, name: &str, named: bool) -> NonTerminalId {
        self.builder.add_nonterminal(name, named)
    }

    pub fn rule(&mut self, lhs: NonTerminalId, rhs: &[Symbol]) {
        self.builder.add_production(lhs, rhs.to_vec());
    }

    pub fn build(self, top: NonTerminalId) -> Arc<Grammar> {
        let patterns: Vec<&str> = self.patterns.iter().map(|(p, _)| p.as_str()).collect();
        let table = (!patterns.is_empty()).then(|| {
            let dfa = dense::Builder::new()
                .configure(
                    dense::Config::new()
                        .match_kind(MatchKind::All)
                        .start_kind(StartKind::Anchored),
                )
                .build_many(&patterns)
                .expect("test patterns compile");
            TokenTable::new(dfa, self.patterns.iter().map(|(_, id)| *id).collect())
        });
        Arc::new(self.builder.build(top, table))
    }
}

/// `@top Program { expression }` arithmetic grammar over names, numbers and `+`/`-`.
pub(crate) fn arithmetic() -> Arc<Grammar> {
    let mut g = TestGrammar::new();
    let open = g.literal("(");
    let close = g.literal(")");
    let name = g.token("Name", "[a-zA-Z]+", true);
    let number = g.token("Number", "[0-9]+", true);
    let operator = g.token("Operator", "[+\\-]", true);

    let program = g.nt("Program", true);
    let expression = g.nt("expression", false);
    let binary = g.nt("BinaryExpression", true);

    g.rule(program, &[Symbol::NonTerminal(expression)]);
    g.rule(expression, &[name]);
    g.rule(expression, &[number]);
    g.rule(expression, &[Symbol::NonTerminal(binary)]);
    g.rule(
        binary,
        &[
            open,
            Symbol::NonTerminal(expression),
            operator,
            Symbol::NonTerminal(expression),
            close,
        ],
    );
    g.build(program)
}
