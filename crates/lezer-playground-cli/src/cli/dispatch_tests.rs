//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Positional shifting: -g shifts a lone positional to the specimen
//! 2. Params extraction: correct fields are extracted from ArgMatches
//! 3. Global flags are visible from every subcommand

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{
    check_command, restore_command, share_command, tree_command, watch_command,
};
use crate::commands::tree::TreeArgs;

#[test]
fn tree_with_two_positionals() {
    let m = tree_command()
        .try_get_matches_from(["tree", "expr.grammar", "input.txt"])
        .unwrap();
    let params = TreeParams::from_matches(&m);

    assert_eq!(params.grammar_path, Some(PathBuf::from("expr.grammar")));
    assert_eq!(params.specimen_path, Some(PathBuf::from("input.txt")));
    assert_eq!(params.grammar_text, None);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn tree_inline_grammar_shifts_positional_to_specimen() {
    let m = tree_command()
        .try_get_matches_from(["tree", "-g", "@top P { \"a\" }", "input.txt"])
        .unwrap();
    let params = TreeParams::from_matches(&m);

    assert_eq!(params.grammar_path, None);
    assert_eq!(params.grammar_text.as_deref(), Some("@top P { \"a\" }"));
    assert_eq!(params.specimen_path, Some(PathBuf::from("input.txt")));
}

#[test]
fn tree_inline_specimen_keeps_grammar_positional() {
    let m = tree_command()
        .try_get_matches_from(["tree", "expr.grammar", "-s", "(1+2)"])
        .unwrap();
    let params = TreeParams::from_matches(&m);

    assert_eq!(params.grammar_path, Some(PathBuf::from("expr.grammar")));
    assert_eq!(params.specimen_path, None);
    assert_eq!(params.specimen_text.as_deref(), Some("(1+2)"));
}

#[test]
fn tree_values_implies_json() {
    let m = tree_command()
        .try_get_matches_from(["tree", "g", "s", "--values", "--compact", "--color", "never"])
        .unwrap();
    let args: TreeArgs = TreeParams::from_matches(&m).into();

    assert!(args.json);
    assert!(args.values);
    assert!(args.compact);
    assert!(!args.color);
}

#[test]
fn tree_rejects_unknown_color() {
    let result = tree_command().try_get_matches_from(["tree", "g", "s", "--color", "sometimes"]);

    assert!(result.is_err());
}

#[test]
fn check_params() {
    let m = check_command()
        .try_get_matches_from(["check", "expr.grammar", "--strict", "--color", "always"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.grammar_path, Some(PathBuf::from("expr.grammar")));
    assert!(params.strict);
    assert_eq!(params.color, ColorChoice::Always);
}

#[test]
fn check_rejects_specimen_flag() {
    let result = check_command().try_get_matches_from(["check", "g", "-s", "x"]);

    assert!(result.is_err());
}

#[test]
fn share_params() {
    let m = share_command()
        .try_get_matches_from(["share", "-g", "G", "-s", "S", "--base-url", "http://x/"])
        .unwrap();
    let params = ShareParams::from_matches(&m);

    assert_eq!(params.grammar_text.as_deref(), Some("G"));
    assert_eq!(params.specimen_text.as_deref(), Some("S"));
    assert_eq!(params.base_url.as_deref(), Some("http://x/"));
}

#[test]
fn restore_requires_link() {
    assert!(restore_command().try_get_matches_from(["restore"]).is_err());

    let m = restore_command()
        .try_get_matches_from(["restore", "#abc", "--out-dir", "out"])
        .unwrap();
    let params = RestoreParams::from_matches(&m);

    assert_eq!(params.link, "#abc");
    assert_eq!(params.out_dir, Some(PathBuf::from("out")));
}

#[test]
fn watch_requires_both_files() {
    assert!(watch_command().try_get_matches_from(["watch", "g"]).is_err());

    let m = watch_command()
        .try_get_matches_from(["watch", "g", "s", "--state", "st.json", "--interval", "250"])
        .unwrap();
    let params = WatchParams::from_matches(&m);

    assert_eq!(params.grammar_path, PathBuf::from("g"));
    assert_eq!(params.specimen_path, PathBuf::from("s"));
    assert_eq!(params.state, Some(PathBuf::from("st.json")));
    assert_eq!(params.interval_ms, 250);
}

#[test]
fn global_flags_after_subcommand() {
    let matches = build_cli()
        .try_get_matches_from(["lezer-playground", "tree", "g", "s", "-vv", "--config", "c.toml"])
        .unwrap();
    let m = matches.subcommand_matches("tree").unwrap();
    let params = GlobalParams::from_matches(m);

    assert_eq!(params.verbose, 2);
    assert_eq!(params.config, Some(PathBuf::from("c.toml")));
}

#[test]
fn global_flags_before_subcommand() {
    let matches = build_cli()
        .try_get_matches_from(["lezer-playground", "-v", "check", "g"])
        .unwrap();
    let m = matches.subcommand_matches("check").unwrap();

    assert_eq!(GlobalParams::from_matches(m).verbose, 1);
}

#[test]
fn subcommand_is_required() {
    assert!(build_cli().try_get_matches_from(["lezer-playground"]).is_err());
}
