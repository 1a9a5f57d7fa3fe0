use super::unescape::{CharRange, parse_char_set, unescape_string};

fn range(start: char, end: char) -> CharRange {
    CharRange { start, end }
}

#[test]
fn plain_string() {
    assert_eq!(unescape_string("abc").as_deref(), Some("abc"));
    assert_eq!(unescape_string("").as_deref(), Some(""));
}

#[test]
fn simple_escapes() {
    assert_eq!(
        unescape_string(r#"\n\r\t\0\"\\"#).as_deref(),
        Some("\n\r\t\0\"\\")
    );
    assert_eq!(unescape_string(r"\b\f\v").as_deref(), Some("\u{8}\u{c}\u{b}"));
}

#[test]
fn unknown_escape_is_the_char_itself() {
    assert_eq!(unescape_string(r"\q\'").as_deref(), Some("q'"));
}

#[test]
fn hex_and_unicode_escapes() {
    assert_eq!(unescape_string(r"\x41é\u{1F600}").as_deref(), Some("Aé😀"));
}

#[test]
fn malformed_escapes() {
    assert_eq!(unescape_string(r"\x4"), None);
    assert_eq!(unescape_string(r"\xZZ"), None);
    assert_eq!(unescape_string(r"\u{}"), None);
    assert_eq!(unescape_string(r"\u{D800}"), None);
    assert_eq!(unescape_string("\\"), None);
}

#[test]
fn char_set_ranges() {
    assert_eq!(
        parse_char_set("a-zA-Z_"),
        Some(vec![range('a', 'z'), range('A', 'Z'), range('_', '_')])
    );
}

#[test]
fn char_set_dashes() {
    assert_eq!(
        parse_char_set("+-"),
        Some(vec![range('+', '+'), range('-', '-')])
    );
    assert_eq!(parse_char_set("-a"), Some(vec![range('-', '-'), range('a', 'a')]));
}

#[test]
fn char_set_escapes() {
    assert_eq!(
        parse_char_set(r"\]\n\\"),
        Some(vec![range(']', ']'), range('\n', '\n'), range('\\', '\\')])
    );
    assert_eq!(parse_char_set(r"\x00-\x1F"), Some(vec![range('\0', '\u{1f}')]));
}

#[test]
fn char_set_reversed_range() {
    assert_eq!(parse_char_set("z-a"), None);
}

#[test]
fn char_set_empty() {
    assert_eq!(parse_char_set(""), Some(vec![]));
}
