//! Reduces a native parse tree to a [`ParseTreeNode`].
//!
//! One depth-first pass: `Enter` pushes a frame, `Leave` pops it and attaches
//! it to the new top frame, or makes it the result when the stack is empty.
//! Malformed event streams become [`SerializeError`]s.

use lezer_playground_core::ParseTreeNode;

use crate::compiler::{Traverse, TraverseEvent};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    #[error("leave event without a matching enter")]
    UnbalancedLeave,

    #[error("{0} nodes were never left")]
    UnclosedNodes(usize),

    #[error("tree has more than one root")]
    MultipleRoots,

    #[error("tree is empty")]
    Empty,
}

pub fn serialize(tree: &(impl Traverse + ?Sized)) -> Result<ParseTreeNode, SerializeError> {
    let mut builder = Builder::default();
    tree.traverse(&mut |event| builder.push(event));
    builder.finish()
}

#[derive(Default)]
struct Builder {
    stack: Vec<ParseTreeNode>,
    root: Option<ParseTreeNode>,
    error: Option<SerializeError>,
}

impl Builder {
    fn push(&mut self, event: TraverseEvent<'_>) {
        if self.error.is_some() {
            return;
        }

        match event {
            TraverseEvent::Enter { name, from, to } => {
                if self.stack.is_empty() && self.root.is_some() {
                    self.error = Some(SerializeError::MultipleRoots);
                    return;
                }
                self.stack.push(ParseTreeNode::new(name, from, to));
            }
            TraverseEvent::Leave => {
                let Some(node) = self.stack.pop() else {
                    self.error = Some(SerializeError::UnbalancedLeave);
                    return;
                };
                match self.stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => self.root = Some(node),
                }
            }
        }
    }

    fn finish(self) -> Result<ParseTreeNode, SerializeError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(SerializeError::UnclosedNodes(self.stack.len()));
        }
        self.root.ok_or(SerializeError::Empty)
    }
}
