//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `Into<*Args>` impls bridge dispatch to command handlers
//! - `-g` shifts a lone positional from grammar to specimen

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::restore::RestoreArgs;
use crate::commands::share::ShareArgs;
use crate::commands::tree::TreeArgs;
use crate::commands::watch::WatchArgs;

/// Flags shared by every subcommand.
pub struct GlobalParams {
    pub verbose: u8,
    pub config: Option<PathBuf>,
}

impl GlobalParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            verbose: m.get_count("verbose"),
            config: m.get_one::<PathBuf>("config").cloned(),
        }
    }
}

pub struct TreeParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub specimen_path: Option<PathBuf>,
    pub specimen_text: Option<String>,
    pub json: bool,
    pub values: bool,
    pub compact: bool,
    pub color: ColorChoice,
}

impl TreeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let grammar_text = m.get_one::<String>("grammar_text").cloned();
        let (grammar_path, specimen_path) = shift_positional_to_specimen(
            grammar_text.is_some(),
            m.get_one::<PathBuf>("grammar_path").cloned(),
            m.get_one::<PathBuf>("specimen_path").cloned(),
        );

        Self {
            grammar_path,
            grammar_text,
            specimen_path,
            specimen_text: m.get_one::<String>("specimen_text").cloned(),
            json: m.get_flag("json"),
            values: m.get_flag("values"),
            compact: m.get_flag("compact"),
            color: parse_color(m),
        }
    }
}

impl From<TreeParams> for TreeArgs {
    fn from(p: TreeParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            specimen_path: p.specimen_path,
            specimen_text: p.specimen_text,
            json: p.json || p.values,
            values: p.values,
            compact: p.compact,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned(),
            grammar_text: m.get_one::<String>("grammar_text").cloned(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct ShareParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub specimen_path: Option<PathBuf>,
    pub specimen_text: Option<String>,
    pub base_url: Option<String>,
}

impl ShareParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let grammar_text = m.get_one::<String>("grammar_text").cloned();
        let (grammar_path, specimen_path) = shift_positional_to_specimen(
            grammar_text.is_some(),
            m.get_one::<PathBuf>("grammar_path").cloned(),
            m.get_one::<PathBuf>("specimen_path").cloned(),
        );

        Self {
            grammar_path,
            grammar_text,
            specimen_path,
            specimen_text: m.get_one::<String>("specimen_text").cloned(),
            base_url: m.get_one::<String>("base_url").cloned(),
        }
    }
}

impl From<ShareParams> for ShareArgs {
    fn from(p: ShareParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            specimen_path: p.specimen_path,
            specimen_text: p.specimen_text,
            base_url: p.base_url,
        }
    }
}

pub struct RestoreParams {
    pub link: String,
    pub out_dir: Option<PathBuf>,
}

impl RestoreParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            link: m.get_one::<String>("link").cloned().unwrap_or_default(),
            out_dir: m.get_one::<PathBuf>("out_dir").cloned(),
        }
    }
}

impl From<RestoreParams> for RestoreArgs {
    fn from(p: RestoreParams) -> Self {
        Self {
            link: p.link,
            out_dir: p.out_dir,
        }
    }
}

pub struct WatchParams {
    pub grammar_path: PathBuf,
    pub specimen_path: PathBuf,
    pub state: Option<PathBuf>,
    pub interval_ms: u64,
    pub color: ColorChoice,
}

impl WatchParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned().unwrap_or_default(),
            specimen_path: m
                .get_one::<PathBuf>("specimen_path")
                .cloned()
                .unwrap_or_default(),
            state: m.get_one::<PathBuf>("state").cloned(),
            interval_ms: m.get_one::<u64>("interval").copied().unwrap_or(100),
            color: parse_color(m),
        }
    }
}

impl From<WatchParams> for WatchArgs {
    fn from(p: WatchParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            specimen_path: p.specimen_path,
            state: p.state,
            interval_ms: p.interval_ms,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// When -g is used with a single positional arg, shift it from grammar to specimen.
/// This enables: `lezer-playground tree -g '@top P { "a" }' input.txt`
fn shift_positional_to_specimen(
    has_grammar_text: bool,
    grammar_path: Option<PathBuf>,
    specimen_path: Option<PathBuf>,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if has_grammar_text && grammar_path.is_some() && specimen_path.is_none() {
        (None, grammar_path)
    } else {
        (grammar_path, specimen_path)
    }
}
