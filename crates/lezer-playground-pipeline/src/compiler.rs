//! The seams between the pipeline and whatever turns grammar text into a parser.

use lezer_playground_runtime::HighlightSpan;

/// One step of a depth-first walk over a parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraverseEvent<'a> {
    Enter { name: &'a str, from: usize, to: usize },
    Leave,
}

/// A tree that can replay itself as enter/leave events in document order.
pub trait Traverse {
    fn traverse(&self, sink: &mut dyn FnMut(TraverseEvent<'_>));
}

/// Compiles grammar text into a runnable parser.
///
/// Errors are human-readable diagnostics. Implementations may panic; the
/// pipeline catches it.
pub trait GrammarCompiler {
    type Parser: SpecimenParser;

    fn compile(&self, grammar: &str) -> Result<Self::Parser, String>;
}

pub trait SpecimenParser {
    type Tree: Traverse;

    fn parse(&self, specimen: &str) -> Result<Self::Tree, String>;

    /// Named-token spans for colouring the specimen.
    fn highlight(&self, _specimen: &str) -> Vec<HighlightSpan> {
        Vec::new()
    }
}

/// Result of the latest compile. Never both a parser and an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledParser<P> {
    Ready { parser: P },
    Failed { diagnostic: String },
}

impl<P> CompiledParser<P> {
    pub fn parser(&self) -> Option<&P> {
        match self {
            Self::Ready { parser } => Some(parser),
            Self::Failed { .. } => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Ready { .. } => None,
            Self::Failed { diagnostic } => Some(diagnostic),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}
