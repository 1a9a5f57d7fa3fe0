use crate::serialize::SerializeError;

/// Failures surfaced by the pipeline as diagnostics.
///
/// None of these are fatal: the pipeline records them and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The grammar did not compile.
    #[error("{0}")]
    GrammarCompile(String),

    /// The compiled parser rejected the specimen (fuel exhaustion or a panic).
    #[error("cannot parse specimen: {0}")]
    SpecimenParse(String),

    #[error("cannot serialize tree: {0}")]
    Serialization(#[from] SerializeError),
}
