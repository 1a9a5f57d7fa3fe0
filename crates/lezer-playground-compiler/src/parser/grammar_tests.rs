use indoc::indoc;

use crate::{Error, GrammarFile, GrammarFileBuilder};

#[test]
fn arithmetic_grammar() {
    let input = indoc! {r#"
    @top Program { expression }

    expression { Name | Number | BinaryExpression }

    BinaryExpression { "(" expression Operator expression ")" }

    @tokens {
      Name { @asciiLetter+ }
      Number { @digit+ }
      Operator { $[+-] }
    }

    @detectDelim
    "#};

    insta::assert_snapshot!(GrammarFile::expect_valid_cst(input), @r#"
    Root
      TopRule
        AtName "@top"
        Id "Program"
        Body
          BraceOpen "{"
          Ref
            Id "expression"
          BraceClose "}"
      Rule
        Id "expression"
        Body
          BraceOpen "{"
          Choice
            Ref
              Id "Name"
            Pipe "|"
            Ref
              Id "Number"
            Pipe "|"
            Ref
              Id "BinaryExpression"
          BraceClose "}"
      Rule
        Id "BinaryExpression"
        Body
          BraceOpen "{"
          Seq
            Literal
              Str "\"(\""
            Ref
              Id "expression"
            Ref
              Id "Operator"
            Ref
              Id "expression"
            Literal
              Str "\")\""
          BraceClose "}"
      TokensBlock
        AtName "@tokens"
        BraceOpen "{"
        Rule
          Id "Name"
          Body
            BraceOpen "{"
            Repeat
              Builtin
                AtName "@asciiLetter"
              Plus "+"
            BraceClose "}"
        Rule
          Id "Number"
          Body
            BraceOpen "{"
            Repeat
              Builtin
                AtName "@digit"
              Plus "+"
            BraceClose "}"
        Rule
          Id "Operator"
          Body
            BraceOpen "{"
            CharSet
              CharClass "$[+-]"
            BraceClose "}"
        BraceClose "}"
      Directive
        AtName "@detectDelim"
    "#);
}

#[test]
fn groups_and_nested_repeats() {
    let input = indoc! {r#"
    @top List { (Item ("," Item)*)? }
    @tokens { Item { _ } }
    "#};

    insta::assert_snapshot!(GrammarFile::expect_valid_cst(input), @r#"
    Root
      TopRule
        AtName "@top"
        Id "List"
        Body
          BraceOpen "{"
          Repeat
            Group
              ParenOpen "("
              Seq
                Ref
                  Id "Item"
                Repeat
                  Group
                    ParenOpen "("
                    Seq
                      Literal
                        Str "\",\""
                      Ref
                        Id "Item"
                    ParenClose ")"
                  Star "*"
              ParenClose ")"
            Question "?"
          BraceClose "}"
      TokensBlock
        AtName "@tokens"
        BraceOpen "{"
        Rule
          Id "Item"
          Body
            BraceOpen "{"
            AnyChar
              Underscore "_"
            BraceClose "}"
        BraceClose "}"
    "#);
}

#[test]
fn skip_precedence_and_markers() {
    let input = indoc! {r#"
    @top P { !high A ~amb }
    @skip { space }
    @precedence { high @left, low }
    @tokens {
      space { " "+ }
      A { "a" }
      @precedence { A, space }
    }
    "#};

    insta::assert_snapshot!(GrammarFile::expect_valid_cst(input), @r#"
    Root
      TopRule
        AtName "@top"
        Id "P"
        Body
          BraceOpen "{"
          Seq
            Marker
              Bang "!"
              Id "high"
            Ref
              Id "A"
            Marker
              Tilde "~"
              Id "amb"
          BraceClose "}"
      SkipBlock
        AtName "@skip"
        Body
          BraceOpen "{"
          Ref
            Id "space"
          BraceClose "}"
      Precedence
        AtName "@precedence"
        BraceOpen "{"
        Ref
          Id "high"
        AtName "@left"
        Comma ","
        Ref
          Id "low"
        BraceClose "}"
      TokensBlock
        AtName "@tokens"
        BraceOpen "{"
        Rule
          Id "space"
          Body
            BraceOpen "{"
            Repeat
              Literal
                Str "\" \""
              Plus "+"
            BraceClose "}"
        Rule
          Id "A"
          Body
            BraceOpen "{"
            Literal
              Str "\"a\""
            BraceClose "}"
        TokenPrecedence
          AtName "@precedence"
          BraceOpen "{"
          Ref
            Id "A"
          Comma ","
          Ref
            Id "space"
          BraceClose "}"
        BraceClose "}"
    "#);
}

#[test]
fn empty_body() {
    insta::assert_snapshot!(GrammarFile::expect_valid_cst("@top P { }"), @r#"
    Root
      TopRule
        AtName "@top"
        Id "P"
        Body
          BraceOpen "{"
          Seq
          BraceClose "}"
    "#);
}

#[test]
fn unclosed_body_recovers_at_next_rule() {
    let input = indoc! {r#"
    @top A { b
    b { "x" }
    "#};

    let grammar = GrammarFile::try_from(input).unwrap();
    insta::assert_snapshot!(grammar.dump_diagnostics(), @"error at 7..12: unclosed rule body (related: rule body starts here at 7..8)");
    insta::assert_snapshot!(grammar.dump_cst(false), @r#"
    Root
      TopRule
        AtName "@top"
        Id "A"
        Body
          BraceOpen "{"
          Ref
            Id "b"
      Rule
        Id "b"
        Body
          BraceOpen "{"
          Literal
            Str "\"x\""
          BraceClose "}"
    "#);
}

#[test]
fn unclosed_body_at_eof_suppresses_inner_errors() {
    insta::assert_snapshot!(GrammarFile::expect_invalid("@top P { a"), @"error at 7..10: unclosed rule body (related: rule body starts here at 7..8)");
}

#[test]
fn unclosed_group() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A { ("a" }"#), @"error at 9..15: unclosed group (related: group starts here at 9..10)");
}

#[test]
fn missing_rule_name() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top { "a" }"#), @"error at 5..6: expected a rule name: e.g. `Program`");
}

#[test]
fn missing_body() {
    let grammar = GrammarFile::try_from(r#"@top A "a""#).unwrap();
    insta::assert_snapshot!(grammar.dump_diagnostics(), @"error at 7..10: expected `{`");
    insta::assert_snapshot!(grammar.dump_cst(false), @r#"
    Root
      TopRule
        AtName "@top"
        Id "A"
      Error
        Str "\"a\""
    "#);
}

#[test]
fn garbage_between_declarations() {
    let grammar = GrammarFile::try_from(r#"@top A { "a" } ) )"#).unwrap();
    insta::assert_snapshot!(grammar.dump_diagnostics(), @"error at 15..16: unexpected token: expected a rule or a declaration");
    insta::assert_snapshot!(grammar.dump_cst(false), @r#"
    Root
      TopRule
        AtName "@top"
        Id "A"
        Body
          BraceOpen "{"
          Literal
            Str "\"a\""
          BraceClose "}"
      Error
        ParenClose ")"
        ParenClose ")"
    "#);
}

#[test]
fn unmatched_paren_in_body() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A { "a" ) "b" }"#), @"error at 13..14: unexpected token: unmatched `)`");
}

#[test]
fn missing_marker_name() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A { ! "a" }"#), @"error at 11..14: expected a marker name");
}

#[test]
fn missing_precedence_comma() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A { "a" } @precedence { x y }"#), @"error at 31..32: unexpected token: expected `,`");
}

#[test]
fn unsupported_declaration() {
    let input = indoc! {r#"
    @top A { "a" }
    @external tokens t from "./t" { T }
    "#};

    insta::assert_snapshot!(GrammarFile::expect_invalid(input), @"error at 15..24: `@external` declarations are not supported");
}

#[test]
fn unknown_declaration() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A { "a" } @bogus { x }"#), @"error at 15..21: unknown declaration `@bogus`");
}

#[test]
fn unsupported_rule_parameters() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A<x> { "x" }"#), @"error at 6..7: rule parameters are not supported");
}

#[test]
fn unsupported_expression() {
    let input = indoc! {r#"
    @top A { @specialize<Name, "if"> }
    @tokens { Name { @asciiLetter+ } }
    "#};

    insta::assert_snapshot!(GrammarFile::expect_invalid(input), @"error at 9..20: `@specialize` expressions are not supported");
}

#[test]
fn unknown_builtin() {
    insta::assert_snapshot!(GrammarFile::expect_invalid(r#"@top A { "a" } @tokens { T { @bogus } }"#), @"error at 29..35: unknown builtin `@bogus`");
}

#[test]
fn deeply_nested_groups_hit_recursion_limit() {
    let depth = 64;
    let mut input = String::from("@top A { ");
    for _ in 0..depth + 1 {
        input.push('(');
    }
    input.push_str(r#""a""#);
    for _ in 0..depth + 1 {
        input.push(')');
    }
    input.push_str(" }");

    let result = GrammarFileBuilder::new(&input)
        .with_recursion_fuel(Some(depth))
        .parse();

    assert!(
        matches!(result, Err(Error::RecursionLimitExceeded)),
        "expected RecursionLimitExceeded error, got {:?}",
        result
    );
}
