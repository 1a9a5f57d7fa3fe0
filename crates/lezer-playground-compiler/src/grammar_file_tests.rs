use indoc::indoc;

use lezer_playground_runtime::Parser;

use crate::diagnostics::DiagnosticsPrinter;
use crate::{Error, GrammarFile, GrammarFileBuilder};

impl<'src> GrammarFile<'src> {
    #[track_caller]
    pub(crate) fn expect_valid(src: &'src str) -> Self {
        let grammar = GrammarFile::try_from(src).unwrap();
        if !grammar.is_valid() {
            panic!(
                "Expected valid grammar, got error:\n{}",
                grammar.dump_diagnostics()
            );
        }
        grammar
    }

    #[track_caller]
    pub(crate) fn expect_valid_cst(src: &'src str) -> String {
        Self::expect_valid(src).dump_cst(false)
    }

    #[track_caller]
    pub(crate) fn expect_valid_bnf(src: &'src str) -> String {
        Self::expect_valid(src).compile().unwrap().grammar.dump()
    }

    /// Filtered diagnostics of an invalid grammar, one per line.
    #[track_caller]
    pub(crate) fn expect_invalid(src: &'src str) -> String {
        let grammar = GrammarFile::try_from(src).unwrap();
        if grammar.is_valid() {
            panic!("Expected invalid grammar, got valid:\n{}", grammar.dump_cst(false));
        }
        grammar.dump_diagnostics()
    }

    pub(crate) fn dump_diagnostics(&self) -> String {
        DiagnosticsPrinter::new(&self.diagnostics()).render()
    }
}

const ARITHMETIC: &str = indoc! {r#"
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

fn parse(grammar: &str, specimen: &str) -> String {
    let compiled = GrammarFile::expect_valid(grammar).compile().unwrap();
    Parser::new(compiled.grammar)
        .parse(specimen)
        .unwrap()
        .dump()
}

#[test]
fn arithmetic_grammar() {
    insta::assert_snapshot!(parse(ARITHMETIC, "(100-(foo+4))"), @r"
    Program 0..13
      BinaryExpression 0..13
        Number 1..4
        Operator 4..5
        BinaryExpression 5..12
          Name 6..9
          Operator 9..10
          Number 10..11
    ");
}

#[test]
fn arithmetic_grammar_bnf() {
    insta::assert_snapshot!(GrammarFile::expect_valid_bnf(ARITHMETIC), @r#"
    @top Program
    Program := expression
    expression := Name
    expression := Number
    expression := BinaryExpression
    BinaryExpression := "(" expression Operator expression ")"
    "#);
}

#[test]
fn single_literal() {
    insta::assert_snapshot!(parse(r#"@top P { "a" }"#, "a"), @"P 0..1");
}

#[test]
fn invalid_grammar_does_not_compile() {
    let grammar = GrammarFile::try_from("@top P { missing }").unwrap();
    assert!(!grammar.is_valid());

    let err = grammar.compile().unwrap_err();
    assert!(matches!(err, Error::GrammarInvalid(ref d) if d.error_count() == 1));
    insta::assert_snapshot!(err.to_string(), @"grammar is invalid with 1 errors");
}

#[test]
fn warnings_do_not_block_compilation() {
    let src = indoc! {r#"
        @top P { "a" }
        Unused { "b" }
    "#};

    let grammar = GrammarFile::try_from(src).unwrap();
    assert!(grammar.is_valid());

    let compiled = grammar.compile().unwrap();
    insta::assert_snapshot!(
        DiagnosticsPrinter::new(&compiled.diagnostics).render(),
        @"warning at 15..21: rule `Unused` is unused"
    );
}

#[test]
fn exec_fuel_exhaustion() {
    let result = GrammarFileBuilder::new(ARITHMETIC)
        .with_exec_fuel(Some(3))
        .parse();

    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
}

#[test]
fn unlimited_fuel() {
    let grammar = GrammarFileBuilder::new(ARITHMETIC)
        .with_exec_fuel(None)
        .with_recursion_fuel(None)
        .parse()
        .unwrap()
        .analyze();

    assert!(grammar.is_valid());
}

#[test]
fn skip_and_comments() {
    let grammar = indoc! {r##"
        @top Program { Name* }
        @skip { space | Comment }
        @tokens {
          space { @whitespace+ }
          Comment { "#" ![\n]* }
          Name { $[a-z]+ }
        }
    "##};

    insta::assert_snapshot!(parse(grammar, "ab # note\ncd"), @r"
    Program 0..12
      Name 0..2
      Comment 3..9
      Name 10..12
    ");
}

#[test]
fn cst_dump_includes_trivia_on_request() {
    let grammar = GrammarFile::try_from("@top P { } // done").unwrap();
    insta::assert_snapshot!(grammar.dump_cst(true), @r#"
    Root
      TopRule
        AtName "@top"
        Whitespace " "
        Id "P"
        Whitespace " "
        Body
          BraceOpen "{"
          Seq
          Whitespace " "
          BraceClose "}"
      Whitespace " "
      LineComment "// done"
    "#);
}
