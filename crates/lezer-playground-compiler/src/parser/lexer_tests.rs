use super::lexer::{lex, token_text};

fn snapshot(input: &str) -> String {
    format_tokens(input, false)
}

fn snapshot_raw(input: &str) -> String {
    format_tokens(input, true)
}

fn format_tokens(input: &str, include_trivia: bool) -> String {
    let mut out = String::new();
    for token in lex(input) {
        if include_trivia || !token.kind.is_trivia() {
            out.push_str(&format!(
                "{:?} {:?}\n",
                token.kind,
                token_text(input, &token)
            ));
        }
    }
    out
}

#[test]
fn punctuation() {
    insta::assert_snapshot!(snapshot("{ } ( ) [ ] < > | * + ? , ! ~ _ ="), @r#"
    BraceOpen "{"
    BraceClose "}"
    ParenOpen "("
    ParenClose ")"
    BracketOpen "["
    BracketClose "]"
    AngleOpen "<"
    AngleClose ">"
    Pipe "|"
    Star "*"
    Plus "+"
    Question "?"
    Comma ","
    Bang "!"
    Tilde "~"
    Underscore "_"
    Equals "="
    "#);
}

#[test]
fn rule_with_tokens() {
    insta::assert_snapshot!(snapshot(r#"@top Program { Name "(" @digit+ }"#), @r#"
    AtName "@top"
    Id "Program"
    BraceOpen "{"
    Id "Name"
    Str "\"(\""
    AtName "@digit"
    Plus "+"
    BraceClose "}"
    "#);
}

#[test]
fn strings_with_escapes() {
    insta::assert_snapshot!(snapshot(r#""a\"b" 'c\'d'"#), @r#"
    Str "\"a\\\"b\""
    Str "'c\\'d'"
    "#);
}

#[test]
fn char_classes() {
    insta::assert_snapshot!(snapshot(r"$[a-z] ![\]x] !name"), @r#"
    CharClass "$[a-z]"
    NegCharClass "![\\]x]"
    Bang "!"
    Id "name"
    "#);
}

#[test]
fn trivia_is_kept() {
    insta::assert_snapshot!(snapshot_raw("a // note\n/* b */ c"), @r#"
    Id "a"
    Whitespace " "
    LineComment "// note"
    Newline "\n"
    BlockComment "/* b */"
    Whitespace " "
    Id "c"
    "#);
}

#[test]
fn unknown_characters_coalesce() {
    insta::assert_snapshot!(snapshot("a #%# b"), @r##"
    Id "a"
    Garbage "#%#"
    Id "b"
    "##);
}

#[test]
fn trailing_garbage() {
    insta::assert_snapshot!(snapshot("a ##"), @r###"
    Id "a"
    Garbage "##"
    "###);
}
