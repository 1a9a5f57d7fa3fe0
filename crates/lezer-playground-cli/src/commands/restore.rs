use std::fs;
use std::path::{Path, PathBuf};

use lezer_playground_pipeline::PersistedState;

use super::input::fail;

pub const GRAMMAR_FILE: &str = "grammar.grammar";
pub const SPECIMEN_FILE: &str = "specimen.txt";

pub struct RestoreArgs {
    pub link: String,
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: RestoreArgs) {
    let state = PersistedState::from_fragment(&args.link).unwrap_or_else(|e| fail(e));

    match args.out_dir {
        Some(dir) => {
            write_editors(&dir, &state).unwrap_or_else(|e| fail(e));
            eprintln!("restored into {}", dir.display());
        }
        None => print!("{}", format_editors(&state)),
    }
}

pub fn format_editors(state: &PersistedState) -> String {
    let mut out = String::new();
    out.push_str("--- grammar ---\n");
    out.push_str(state.grammar());
    if !state.grammar().ends_with('\n') {
        out.push('\n');
    }
    out.push_str("--- specimen ---\n");
    out.push_str(state.specimen());
    if !state.specimen().ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn write_editors(dir: &Path, state: &PersistedState) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(GRAMMAR_FILE), state.grammar())?;
    fs::write(dir.join(SPECIMEN_FILE), state.specimen())
}
