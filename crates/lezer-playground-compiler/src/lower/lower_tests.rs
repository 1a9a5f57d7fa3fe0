use indoc::indoc;

use lezer_playground_runtime::Parser;

use crate::GrammarFile;

fn parse(grammar: &str, specimen: &str) -> String {
    let compiled = GrammarFile::expect_valid(grammar).compile().unwrap();
    Parser::new(compiled.grammar).parse(specimen).unwrap().dump()
}

#[test]
fn repeats_become_left_recursive_rules() {
    let input = indoc! {r#"
    @top P { "a"* "b"+ "c"? }
    "#};

    insta::assert_snapshot!(GrammarFile::expect_valid_bnf(input), @r#"
    @top P
    P/1 := ε
    P/1 := P/1 "a"
    P/2 := "b"
    P/2 := P/2 "b"
    P/3 := ε
    P/3 := "c"
    P := P/1 P/2 P/3
    "#);
}

#[test]
fn nested_choice_becomes_synthetic_rule() {
    insta::assert_snapshot!(GrammarFile::expect_valid_bnf(r#"@top P { ("a" | "b") "c" }"#), @r#"
    @top P
    P/1 := "a"
    P/1 := "b"
    P := P/1 "c"
    "#);
}

#[test]
fn single_item_group_is_inlined() {
    insta::assert_snapshot!(GrammarFile::expect_valid_bnf(r#"@top P { ("a") | () }"#), @r#"
    @top P
    P := "a"
    P := ε
    "#);
}

#[test]
fn markers_and_empty_literals_match_nothing() {
    insta::assert_snapshot!(GrammarFile::expect_valid_bnf(r#"@top P { !p "a" "" ~q }"#), @r#"
    @top P
    P := "a"
    "#);
}

#[test]
fn skip_tokens_are_marked() {
    let input = indoc! {r#"
    @top P { Word+ }
    @skip { space | "," }
    @tokens {
      Word { @asciiLetter+ }
      space { @whitespace+ }
    }
    "#};

    insta::assert_snapshot!(GrammarFile::expect_valid_bnf(input), @r#"
    @top P
    P/1 := Word
    P/1 := P/1 Word
    P := P/1
    @skip space ","
    "#);
    insta::assert_snapshot!(parse(input, "ab, c"), @r"
    P 0..5
      Word 0..2
      Word 4..5
    ");
}

#[test]
fn only_capitalized_rules_make_nodes() {
    let input = indoc! {r#"
    @top Program { item+ }
    item { Name | Group }
    Group { "[" item* "]" }
    @tokens { Name { $[a-z]+ } }
    "#};

    insta::assert_snapshot!(parse(input, "a[b]"), @r"
    Program 0..4
      Name 0..1
      Group 1..4
        Name 2..3
    ");
}

#[test]
fn literals_beat_token_rules() {
    let input = indoc! {r#"
    @top P { (Keyword | Name)+ }
    Keyword { "if" }
    @skip { space }
    @tokens {
      Name { @asciiLetter+ }
      space { " "+ }
    }
    "#};

    insta::assert_snapshot!(parse(input, "if iffy"), @r"
    P 0..7
      Keyword 0..2
      Name 3..7
    ");
}

#[test]
fn declared_precedence_wins_ties() {
    let input = indoc! {r#"
    @top P { (Int | Ident)+ }
    @skip { space }
    @tokens {
      Ident { $[a-z0-9]+ }
      Int { @digit+ }
      space { " "+ }
      @precedence { Int, Ident }
    }
    "#};

    insta::assert_snapshot!(parse(input, "12 a1 3"), @r"
    P 0..7
      Int 0..2
      Ident 3..5
      Int 6..7
    ");
}

#[test]
fn declaration_order_breaks_ties_without_precedence() {
    let input = indoc! {r#"
    @top P { (Int | Ident)+ }
    @tokens {
      Ident { $[a-z0-9]+ }
      Int { @digit+ }
    }
    "#};

    insta::assert_snapshot!(parse(input, "12"), @r"
    P 0..2
      Ident 0..2
    ");
}

#[test]
fn token_references_are_inlined() {
    let input = indoc! {r#"
    @top P { Float }
    @tokens {
      digits { @digit+ }
      Float { digits ("." digits)? }
    }
    "#};

    insta::assert_snapshot!(parse(input, "3.14"), @r"
    P 0..4
      Float 0..4
    ");
}

#[test]
fn any_char_and_negated_sets() {
    let input = indoc! {r#"
    @top P { String }
    @tokens {
      String { '"' (!["\\] | "\\" _)* '"' }
    }
    "#};

    insta::assert_snapshot!(parse(input, r#""a\"b""#), @r"
    P 0..6
      String 0..6
    ");
}

#[test]
fn grammar_without_tokens() {
    insta::assert_snapshot!(parse("@top P { }", ""), @"P 0..0");
}
