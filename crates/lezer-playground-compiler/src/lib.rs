//! Compiler for the Lezer grammar language.
//!
//! # Example
//!
//! ```
//! use lezer_playground_compiler::GrammarFile;
//!
//! let source = r#"
//!     @top Program { Number+ }
//!     @tokens { Number { @digit+ } }
//! "#;
//!
//! let grammar = GrammarFile::try_from(source).expect("out of fuel");
//! eprintln!("{}", grammar.diagnostics().render(source));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod diagnostics;
pub mod grammar_file;
pub mod lower;
pub mod parser;

#[cfg(test)]
mod grammar_file_tests;

/// Result type for passes that produce both output and diagnostics.
///
/// Fatal errors (like fuel exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use grammar_file::{Compiled, GrammarFile, GrammarFileBuilder};

/// Errors that can occur while compiling a grammar.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("grammar is invalid with {} errors", .0.error_count())]
    GrammarInvalid(Diagnostics),

    /// The analyzed grammar could not be turned into tables.
    #[error("cannot build parser: {0}")]
    Lower(String),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
