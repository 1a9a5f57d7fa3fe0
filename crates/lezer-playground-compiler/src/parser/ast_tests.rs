use indoc::indoc;

use super::unescape::CharRange;
use super::{Expr, Item, RepeatOp, parse};

fn items(src: &str) -> Vec<Item> {
    let (parse, _) = parse(src).unwrap();
    parse.root().items().collect()
}

fn top_expr(src: &str) -> Expr {
    let Some(Item::Top(top)) = items(src).into_iter().next() else {
        panic!("expected @top first");
    };
    top.body().and_then(|b| b.expr()).expect("top body")
}

#[test]
fn items_in_source_order() {
    let src = indoc! {r#"
    @top P { a }
    a { "x" }
    @tokens { T { "t" } }
    @skip { T }
    @detectDelim
    "#};

    let kinds: Vec<&str> = items(src)
        .iter()
        .map(|item| match item {
            Item::Top(_) => "top",
            Item::Rule(_) => "rule",
            Item::Tokens(_) => "tokens",
            Item::Skip(_) => "skip",
            Item::Precedence(_) => "precedence",
            Item::Directive(_) => "directive",
            Item::Unsupported(_) => "unsupported",
        })
        .collect();
    assert_eq!(kinds, ["top", "rule", "tokens", "skip", "directive"]);
}

#[test]
fn rule_names() {
    let items = items("@top P { a }\na { }");
    let Item::Top(top) = &items[0] else { panic!() };
    let Item::Rule(rule) = &items[1] else { panic!() };
    assert_eq!(top.name().unwrap().text(), "P");
    assert_eq!(rule.name().unwrap().text(), "a");
}

#[test]
fn choice_alternatives() {
    let Expr::Choice(choice) = top_expr("@top P { a | b c | }") else {
        panic!("expected choice");
    };
    let alts: Vec<Expr> = choice.alternatives().collect();
    assert_eq!(alts.len(), 3);
    assert!(matches!(alts[0], Expr::Ref(_)));
    let Expr::Seq(seq) = &alts[1] else { panic!() };
    assert_eq!(seq.items().count(), 2);
    let Expr::Seq(empty) = &alts[2] else { panic!() };
    assert_eq!(empty.items().count(), 0);
}

#[test]
fn repeat_operators() {
    let ops = |src: &str| {
        let Expr::Repeat(repeat) = top_expr(src) else {
            panic!("expected repeat");
        };
        repeat.op()
    };
    assert_eq!(ops("@top P { a* }"), Some(RepeatOp::ZeroOrMore));
    assert_eq!(ops("@top P { a+ }"), Some(RepeatOp::OneOrMore));
    assert_eq!(ops("@top P { a? }"), Some(RepeatOp::Optional));
}

#[test]
fn nested_repeat_owns_outer_operator() {
    let Expr::Repeat(outer) = top_expr("@top P { a+? }") else {
        panic!("expected repeat");
    };
    assert_eq!(outer.op(), Some(RepeatOp::Optional));
    let Some(Expr::Repeat(inner)) = outer.inner() else {
        panic!("expected inner repeat");
    };
    assert_eq!(inner.op(), Some(RepeatOp::OneOrMore));
}

#[test]
fn literal_value_is_unescaped() {
    let Expr::Literal(literal) = top_expr(r#"@top P { "a\"\n" }"#) else {
        panic!("expected literal");
    };
    assert_eq!(literal.value().as_deref(), Some("a\"\n"));

    let Expr::Literal(single) = top_expr("@top P { 'it' }") else {
        panic!("expected literal");
    };
    assert_eq!(single.value().as_deref(), Some("it"));
}

#[test]
fn char_set_ranges() {
    let src = indoc! {r#"
    @top P { T }
    @tokens { T { ![a-c_] } }
    "#};
    let items = items(src);
    let Item::Tokens(block) = &items[1] else { panic!() };
    let rule = block.rules().next().unwrap();
    let Some(Expr::CharSet(set)) = rule.body().and_then(|b| b.expr()) else {
        panic!("expected char set");
    };
    assert!(set.is_negated());
    assert_eq!(
        set.ranges(),
        Some(vec![
            CharRange { start: 'a', end: 'c' },
            CharRange { start: '_', end: '_' },
        ])
    );
}

#[test]
fn token_precedence_entries() {
    let items = items(r#"@tokens { @precedence { A, "x" @left, B } }"#);
    let Item::Tokens(block) = &items[0] else { panic!() };
    let precedence = block.precedences().next().unwrap();
    let entries: Vec<String> = precedence
        .entries()
        .map(|e| e.as_cst().text().to_string())
        .collect();
    assert_eq!(entries, ["A", "\"x\"", "B"]);
}

#[test]
fn empty_group() {
    let Expr::Group(group) = top_expr("@top P { () }") else {
        panic!("expected group");
    };
    let Some(Expr::Seq(seq)) = group.inner() else {
        panic!("expected empty seq");
    };
    assert_eq!(seq.items().count(), 0);
}
