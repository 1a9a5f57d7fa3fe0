use std::path::PathBuf;

use lezer_playground_core::{Colors, ParseTreeNode};
use lezer_playground_pipeline::{Pipeline, PlaygroundConfig, Status};

use super::input::{Editor, fail, load};

pub struct TreeArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub specimen_path: Option<PathBuf>,
    pub specimen_text: Option<String>,
    pub json: bool,
    pub values: bool,
    pub compact: bool,
    pub color: bool,
}

pub fn run(args: TreeArgs, config: &PlaygroundConfig) {
    let grammar = load(
        Editor::Grammar,
        args.grammar_path.as_deref(),
        args.grammar_text.as_deref(),
    )
    .unwrap_or_else(|e| fail(e));
    let specimen = load(
        Editor::Specimen,
        args.specimen_path.as_deref(),
        args.specimen_text.as_deref(),
    )
    .unwrap_or_else(|e| fail(e));

    let pipeline = Pipeline::new(config.compiler(), grammar, specimen, config.debounce());

    if let Status::Failed(diagnostic) = pipeline.status() {
        eprint!("{diagnostic}");
        std::process::exit(1);
    }
    if let Some(error) = pipeline.specimen_error() {
        fail(error);
    }
    let Some(tree) = pipeline.tree() else {
        fail("parser produced no tree");
    };

    print!("{}", render(tree, pipeline.specimen(), &args));
}

fn render(tree: &ParseTreeNode, specimen: &str, args: &TreeArgs) -> String {
    if args.values {
        let valued = tree.with_values(specimen);
        let json = if args.compact {
            serde_json::to_string(&valued)
        } else {
            serde_json::to_string_pretty(&valued)
        };
        return json.unwrap_or_else(|e| fail(e)) + "\n";
    }

    if args.json {
        return tree.format_json(!args.compact, Colors::new(args.color)) + "\n";
    }

    tree.printer().source(specimen).colored(args.color).dump()
}
