//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file (positional).
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .help("Grammar file (`-` for stdin)")
}

/// Inline grammar text (-g/--grammar).
pub fn grammar_text_arg() -> Arg {
    Arg::new("grammar_text")
        .short('g')
        .long("grammar")
        .value_name("TEXT")
        .help("Inline grammar text")
}

/// Specimen file (positional).
pub fn specimen_path_arg() -> Arg {
    Arg::new("specimen_path")
        .value_name("SPECIMEN")
        .value_parser(value_parser!(PathBuf))
        .help("Specimen file to parse (`-` for stdin)")
}

/// Inline specimen text (-s/--specimen).
pub fn specimen_text_arg() -> Arg {
    Arg::new("specimen_text")
        .short('s')
        .long("specimen")
        .value_name("TEXT")
        .help("Inline specimen text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Print JSON instead of the indented tree (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output the tree as JSON")
}

/// Include covered text in JSON nodes (--values).
pub fn values_arg() -> Arg {
    Arg::new("values")
        .long("values")
        .action(ArgAction::SetTrue)
        .help("Output JSON with `type` and `value` keys (implies --json)")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON")
}

/// Base URL for shared links (--base-url).
pub fn base_url_arg() -> Arg {
    Arg::new("base_url")
        .long("base-url")
        .value_name("URL")
        .help("Base URL of the playground (default from config)")
}

/// Shared link or bare fragment (positional, required).
pub fn link_arg() -> Arg {
    Arg::new("link")
        .value_name("URL|FRAGMENT")
        .required(true)
        .help("Shared link, `#fragment`, or bare fragment")
}

/// Directory to write restored editors to (--out-dir).
pub fn out_dir_arg() -> Arg {
    Arg::new("out_dir")
        .long("out-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Write `grammar.grammar` and `specimen.txt` into DIR")
}

/// State file for watch sessions (--state).
pub fn state_arg() -> Arg {
    Arg::new("state")
        .long("state")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Mirror the watched files into FILE after every change; never read back")
}

/// Poll interval in milliseconds (--interval).
pub fn interval_arg() -> Arg {
    Arg::new("interval")
        .long("interval")
        .value_name("MS")
        .default_value("100")
        .value_parser(value_parser!(u64))
        .help("How often to check the files for changes")
}

/// Verbosity level (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log more (-v info, -vv debug, -vvv trace)")
}

/// Config file (--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .global(true)
        .help("TOML config file (default: ./lezer-playground.toml if present)")
}
