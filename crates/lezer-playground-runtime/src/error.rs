/// Errors that abort a specimen parse.
///
/// Malformed input is not an error; it is represented by error nodes in the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Execution fuel exhausted (too many chart items or reconstruction steps).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Derivation nested deeper than the recursion limit.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}
