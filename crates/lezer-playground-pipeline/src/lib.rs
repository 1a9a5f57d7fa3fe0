//! Reactive compile-and-parse pipeline for the Lezer grammar playground.
//!
//! A [`Pipeline`] owns the grammar text, the specimen text and everything
//! derived from them. Grammar edits are debounced before recompiling; specimen
//! edits reparse on the next [`Pipeline::tick`]. Time is always passed in by
//! the caller, so the whole state machine is deterministic under test.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use lezer_playground_pipeline::{LezerCompiler, Pipeline, Status};
//!
//! let start = Instant::now();
//! let mut pipeline = Pipeline::new(
//!     LezerCompiler::default(),
//!     r#"@top P { "a" }"#,
//!     "a",
//!     Duration::from_millis(500),
//! );
//! assert_eq!(pipeline.status(), Status::Ready);
//!
//! pipeline.set_specimen("b", start);
//! pipeline.tick(start);
//! assert!(pipeline.tree().is_some_and(|t| t.has_errors()));
//! ```

pub mod compiler;
pub mod config;
pub mod debounce;
pub mod defaults;
pub mod lezer;
pub mod persist;
pub mod pipeline;
pub mod serialize;
pub mod session;

mod error;

#[cfg(test)]
mod debounce_tests;
#[cfg(test)]
mod persist_tests;
#[cfg(test)]
mod serialize_tests;
#[cfg(test)]
mod test_utils;

pub use compiler::{CompiledParser, GrammarCompiler, SpecimenParser, Traverse, TraverseEvent};
pub use config::{ConfigError, PlaygroundConfig};
pub use debounce::Debouncer;
pub use error::PipelineError;
pub use lezer::LezerCompiler;
pub use persist::{FileStore, MemoryStore, PersistError, PersistedState, StateStore};
pub use pipeline::{Command, Pipeline, Stats, Status, Transition};
pub use serialize::{SerializeError, serialize};
pub use session::Session;
