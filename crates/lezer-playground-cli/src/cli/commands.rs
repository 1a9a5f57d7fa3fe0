//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("lezer-playground")
        .about("Compile Lezer grammars and inspect the trees they produce")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .arg(config_arg())
        .subcommand(tree_command())
        .subcommand(check_command())
        .subcommand(share_command())
        .subcommand(restore_command())
        .subcommand(watch_command())
}

/// Compile a grammar and print the tree for a specimen.
pub fn tree_command() -> Command {
    Command::new("tree")
        .about("Compile a grammar and print the parse tree of a specimen")
        .override_usage(
            "\
  lezer-playground tree <GRAMMAR> <SPECIMEN>
  lezer-playground tree <GRAMMAR> -s <TEXT>
  lezer-playground tree -g <TEXT> <SPECIMEN>",
        )
        .after_help(
            r#"EXAMPLES:
  lezer-playground tree expr.grammar input.txt
  lezer-playground tree expr.grammar -s '(1+2)'
  lezer-playground tree -g '@top P { "a" }' -s a --json
  lezer-playground tree expr.grammar input.txt --json --values"#,
        )
        .arg(grammar_path_arg())
        .arg(specimen_path_arg())
        .arg(grammar_text_arg())
        .arg(specimen_text_arg())
        .arg(json_arg())
        .arg(values_arg())
        .arg(compact_arg())
        .arg(color_arg())
}

/// Validate a grammar.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a grammar")
        .override_usage(
            "\
  lezer-playground check <GRAMMAR>
  lezer-playground check -g <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  lezer-playground check expr.grammar
  lezer-playground check expr.grammar --strict
  lezer-playground check -g '@top P { "a" }'"#,
        )
        .arg(grammar_path_arg())
        .arg(grammar_text_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Print a link that restores grammar and specimen.
pub fn share_command() -> Command {
    Command::new("share")
        .about("Print a shareable playground link")
        .after_help(
            r#"EXAMPLES:
  lezer-playground share expr.grammar input.txt
  lezer-playground share -g '@top P { "a" }' -s a --base-url http://localhost:3000/"#,
        )
        .arg(grammar_path_arg())
        .arg(specimen_path_arg())
        .arg(grammar_text_arg())
        .arg(specimen_text_arg())
        .arg(base_url_arg())
}

/// Decode a shared link.
pub fn restore_command() -> Command {
    Command::new("restore")
        .about("Decode a shared playground link")
        .after_help(
            r#"EXAMPLES:
  lezer-playground restore 'https://lezer-playground.vercel.app/#G0IA...'
  lezer-playground restore '#G0IA...' --out-dir ./restored"#,
        )
        .arg(link_arg())
        .arg(out_dir_arg())
}

/// Re-run the pipeline whenever the files change.
pub fn watch_command() -> Command {
    Command::new("watch")
        .about("Watch a grammar and a specimen, printing each new tree")
        .after_help(
            r#"EXAMPLES:
  lezer-playground watch expr.grammar input.txt
  lezer-playground watch expr.grammar input.txt --state .playground.json"#,
        )
        .arg(grammar_path_arg().required(true))
        .arg(specimen_path_arg().required(true))
        .arg(state_arg())
        .arg(interval_arg())
        .arg(color_arg())
}
