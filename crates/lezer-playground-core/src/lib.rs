//! Core data structures shared by the Lezer playground crates.
//!
//! [`ParseTreeNode`] is the serializable shape every parse result is reduced to
//! before it leaves the pipeline. Rendering helpers live next to it so the CLI
//! and tests agree on one textual form.

pub mod colors;
pub mod tree;


pub use colors::Colors;
pub use tree::{ParseTreeNode, TreePrinter, ValuedTree};
