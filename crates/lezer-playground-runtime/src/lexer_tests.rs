use crate::lexer::{Token, tokenize};
use crate::test_utils::{TestGrammar, arithmetic};
use crate::{Symbol, TokenId};

fn id(symbol: Symbol) -> Option<TokenId> {
    match symbol {
        Symbol::Token(t) => Some(t),
        Symbol::NonTerminal(_) => None,
    }
}

#[test]
fn longest_match_wins() {
    let mut g = TestGrammar::new();
    let short = g.literal("=");
    let long = g.literal("==");
    let p = g.nt("P", true);
    g.rule(p, &[short, long]);
    let grammar = g.build(p);

    let tokens = tokenize(&grammar, "===");
    assert_eq!(
        tokens,
        [
            Token {
                id: id(long),
                from: 0,
                to: 2
            },
            Token {
                id: id(short),
                from: 2,
                to: 3
            },
        ]
    );
}

#[test]
fn equal_length_prefers_lower_pattern() {
    let mut g = TestGrammar::new();
    let keyword = g.literal("if");
    let name = g.token("Name", "[a-z]+", true);
    let p = g.nt("P", true);
    g.rule(p, &[keyword, name]);
    let grammar = g.build(p);

    let tokens = tokenize(&grammar, "if");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].id, id(keyword));

    let tokens = tokenize(&grammar, "iffy");
    assert_eq!(tokens[0].id, id(name));
}

#[test]
fn unmatched_characters_coalesce() {
    let grammar = arithmetic();
    let tokens = tokenize(&grammar, "1 ??é2");

    let spans: Vec<(bool, usize, usize)> =
        tokens.iter().map(|t| (t.is_error(), t.from, t.to)).collect();
    assert_eq!(spans, [(false, 0, 1), (true, 1, 6), (false, 6, 7)]);
}

#[test]
fn empty_matches_are_ignored() {
    let mut g = TestGrammar::new();
    let maybe = g.token("Maybe", "a*", true);
    let p = g.nt("P", true);
    g.rule(p, &[maybe]);
    let grammar = g.build(p);

    let tokens = tokenize(&grammar, "b");
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_error());
}

#[test]
fn grammar_without_tokens_marks_everything_as_error() {
    let mut g = TestGrammar::new();
    let p = g.nt("P", true);
    g.rule(p, &[]);
    let grammar = g.build(p);

    let tokens = tokenize(&grammar, "abc");
    assert_eq!(
        tokens,
        [Token {
            id: None,
            from: 0,
            to: 3
        }]
    );
}
