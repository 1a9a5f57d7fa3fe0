//! Logging to stderr through `tracing-subscriber`.
//!
//! `RUST_LOG` wins when set. Otherwise `-v` flags pick the level for the
//! playground crates: none is `warn`, then `info`, `debug`, `trace`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

const CRATES: [&str; 5] = [
    "lezer_playground",
    "lezer_playground_compiler",
    "lezer_playground_core",
    "lezer_playground_pipeline",
    "lezer_playground_runtime",
];

pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init(verbose: u8) {
    let filter = build_env_filter(level_for(verbose));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Playground crates at `level`, everything else at `warn`.
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    let mut directives = String::from("warn");
    for krate in CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}
