//! Decoding of string literal and character set contents.

use std::iter::Peekable;
use std::str::Chars;

/// Inclusive character range from a `$[...]` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharRange {
    pub start: char,
    pub end: char,
}

/// Decodes the text between the quotes of a string literal.
pub fn unescape_string(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(read_escape(&mut chars)?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Decodes the text between `$[` and `]`. A `-` between two characters forms a range.
pub fn parse_char_set(raw: &str) -> Option<Vec<CharRange>> {
    let mut ranges = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        let start = if c == '\\' {
            read_escape(&mut chars)?
        } else {
            c
        };

        let mut end = start;
        if chars.peek() == Some(&'-') {
            let mut lookahead = chars.clone();
            lookahead.next();
            if lookahead.peek().is_some() {
                chars.next();
                let c = chars.next()?;
                end = if c == '\\' {
                    read_escape(&mut chars)?
                } else {
                    c
                };
            }
        }

        if start > end {
            return None;
        }
        ranges.push(CharRange { start, end });
    }

    Some(ranges)
}

/// Reads the escape sequence following a backslash.
fn read_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let c = chars.next()?;
    let decoded = match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        'x' => read_hex(chars, 2)?,
        'u' if chars.peek() == Some(&'{') => {
            chars.next();
            let mut value = 0u32;
            let mut digits = 0;
            loop {
                let c = chars.next()?;
                if c == '}' {
                    break;
                }
                value = value.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
                digits += 1;
            }
            if digits == 0 {
                return None;
            }
            char::from_u32(value)?
        }
        'u' => read_hex(chars, 4)?,
        other => other,
    };
    Some(decoded)
}

fn read_hex(chars: &mut Peekable<Chars<'_>>, count: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
