use std::path::PathBuf;

use lezer_playground_pipeline::defaults::{DEFAULT_GRAMMAR, DEFAULT_SPECIMEN};
use lezer_playground_pipeline::{PersistedState, PlaygroundConfig};

use super::input::{Editor, fail, load_optional};

pub struct ShareArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub specimen_path: Option<PathBuf>,
    pub specimen_text: Option<String>,
    pub base_url: Option<String>,
}

pub fn run(args: ShareArgs, config: &PlaygroundConfig) {
    let grammar = load_optional(
        Editor::Grammar,
        args.grammar_path.as_deref(),
        args.grammar_text.as_deref(),
    )
    .unwrap_or_else(|e| fail(e))
    .unwrap_or_else(|| DEFAULT_GRAMMAR.to_string());
    let specimen = load_optional(
        Editor::Specimen,
        args.specimen_path.as_deref(),
        args.specimen_text.as_deref(),
    )
    .unwrap_or_else(|e| fail(e))
    .unwrap_or_else(|| DEFAULT_SPECIMEN.to_string());

    let base = args.base_url.as_deref().unwrap_or(&config.share_base_url);
    println!("{}", PersistedState::new(grammar, specimen).share_url(base));
}
