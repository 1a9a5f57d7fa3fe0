use std::path::PathBuf;

use lezer_playground_compiler::GrammarFileBuilder;
use lezer_playground_pipeline::PlaygroundConfig;

use super::input::{Editor, fail, load};

pub struct CheckArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs, config: &PlaygroundConfig) {
    let source = load(
        Editor::Grammar,
        args.grammar_path.as_deref(),
        args.grammar_text.as_deref(),
    )
    .unwrap_or_else(|e| fail(e));

    if source.trim().is_empty() {
        fail("grammar cannot be empty");
    }

    let fuel = |n: u32| (n > 0).then_some(n);
    let grammar = match GrammarFileBuilder::new(&source)
        .with_exec_fuel(fuel(config.compile.exec_fuel))
        .with_recursion_fuel(fuel(config.compile.recursion_limit))
        .parse()
    {
        Ok(parsed) => parsed.analyze(),
        Err(e) => fail(e),
    };

    let diagnostics = grammar.diagnostics();
    let valid = if args.strict {
        !diagnostics.has_errors() && !diagnostics.has_warnings()
    } else {
        grammar.is_valid()
    };

    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.render_colored(&source, args.color));
    }
    if !valid {
        std::process::exit(1);
    }

    // Lowering can still fail on token patterns the DFA builder rejects.
    if let Err(e) = grammar.compile() {
        fail(e);
    }

    // Silent on success (like cargo check)
}
