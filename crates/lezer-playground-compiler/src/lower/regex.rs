//! Token expressions to regex syntax, and the combined token DFA.

use std::fmt::Write;

use regex_automata::MatchKind;
use regex_automata::dfa::{StartKind, dense};

use crate::Error;
use crate::parser::unescape::CharRange;
use crate::parser::CharSet;

/// Bound on DFA memory for untrusted grammars.
const DFA_SIZE_LIMIT: usize = 16 * (1 << 20);

pub(super) fn escape_literal(text: &str) -> String {
    regex_syntax::escape(text)
}

pub(super) fn builtin(name: &str) -> &'static str {
    match name {
        "@asciiLetter" => "[a-zA-Z]",
        "@asciiUpperCase" => "[A-Z]",
        "@asciiLowerCase" => "[a-z]",
        "@digit" => "[0-9]",
        "@whitespace" => r"\s",
        "@eof" => r"\z",
        _ => "",
    }
}

pub(super) fn char_set(set: &CharSet) -> String {
    let ranges = set.ranges().unwrap_or_default();
    if ranges.is_empty() && set.is_negated() {
        return "(?s:.)".to_string();
    }

    let mut out = String::from(if set.is_negated() { "[^" } else { "[" });
    for CharRange { start, end } in ranges {
        push_char(&mut out, start);
        if start != end {
            out.push('-');
            push_char(&mut out, end);
        }
    }
    out.push(']');
    out
}

fn push_char(out: &mut String, c: char) {
    write!(out, "\\x{{{:X}}}", c as u32).expect("String write never fails");
}

/// Wraps `inner` so postfix operators and concatenation bind to all of it.
pub(super) fn group(inner: &str) -> String {
    format!("(?:{inner})")
}

/// Builds the anchored multi-pattern DFA. Pattern order is tie-break order.
pub(super) fn build_dfa(patterns: &[String]) -> Result<dense::DFA<Vec<u32>>, Error> {
    dense::Builder::new()
        .configure(
            dense::Config::new()
                .match_kind(MatchKind::All)
                .start_kind(StartKind::Anchored)
                .dfa_size_limit(Some(DFA_SIZE_LIMIT))
                .determinize_size_limit(Some(DFA_SIZE_LIMIT)),
        )
        .build_many(patterns)
        .map_err(|e| Error::Lower(e.to_string()))
}
