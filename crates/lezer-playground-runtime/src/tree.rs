//! Native parse tree.
//!
//! Nodes live in an arena; [`NodeRef`] is a cheap borrowed view. Traversal is
//! iterative so deep trees cannot overflow the stack.

use std::fmt::Write;
use std::sync::Arc;

use crate::ERROR_NODE_NAME;
use crate::grammar::{Grammar, NonTerminalId, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    NonTerminal(NonTerminalId),
    Token(TokenId),
    Error,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub from: usize,
    pub to: usize,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    grammar: Arc<Grammar>,
    nodes: Vec<NodeData>,
    root: usize,
}

/// Callbacks for [`Tree::iterate`]. `leave` is called after all children.
pub trait Visitor {
    fn enter(&mut self, node: NodeRef<'_>);
    fn leave(&mut self, node: NodeRef<'_>);
}

#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: usize,
}

impl<'t> NodeRef<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id]
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn name(&self) -> &'t str {
        match self.data().kind {
            NodeKind::NonTerminal(nt) => &self.tree.grammar.nonterminal(nt).name,
            NodeKind::Token(t) => &self.tree.grammar.token(t).name,
            NodeKind::Error => ERROR_NODE_NAME,
        }
    }

    pub fn from(&self) -> usize {
        self.data().from
    }

    pub fn to(&self) -> usize {
        self.data().to
    }

    pub fn is_error(&self) -> bool {
        self.data().kind == NodeKind::Error
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}..{}", self.name(), self.from(), self.to())
    }
}

impl Tree {
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == NodeKind::Error)
    }

    /// Depth-first traversal in document order.
    pub fn iterate<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let mut stack = vec![(self.root, 0usize)];
        visitor.enter(self.root());

        while let Some(&(id, next)) = stack.last() {
            if let Some(&child) = self.nodes[id].children.get(next) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                visitor.enter(NodeRef {
                    tree: self,
                    id: child,
                });
                stack.push((child, 0));
            } else {
                stack.pop();
                visitor.leave(NodeRef { tree: self, id });
            }
        }
    }

    /// Indented `Name from..to` listing.
    pub fn dump(&self) -> String {
        struct Dump {
            out: String,
            depth: usize,
        }

        impl Visitor for Dump {
            fn enter(&mut self, node: NodeRef<'_>) {
                let _ = writeln!(
                    self.out,
                    "{}{} {}..{}",
                    "  ".repeat(self.depth),
                    node.name(),
                    node.from(),
                    node.to()
                );
                self.depth += 1;
            }

            fn leave(&mut self, _node: NodeRef<'_>) {
                self.depth -= 1;
            }
        }

        let mut dump = Dump {
            out: String::new(),
            depth: 0,
        };
        self.iterate(&mut dump);
        dump.out
    }
}

/// Arena builder used by the parser to assemble a [`Tree`].
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub(crate) fn push(&mut self, kind: NodeKind, from: usize, to: usize) -> usize {
        self.nodes.push(NodeData {
            kind,
            from,
            to,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Appends `children` and widens the node's span to cover them.
    pub(crate) fn attach(&mut self, parent: usize, children: Vec<usize>) {
        for &child in &children {
            let (from, to) = (self.nodes[child].from, self.nodes[child].to);
            let node = &mut self.nodes[parent];
            node.from = node.from.min(from);
            node.to = node.to.max(to);
        }
        self.nodes[parent].children.extend(children);
    }

    pub(crate) fn set_span(&mut self, id: usize, from: usize, to: usize) {
        self.nodes[id].from = from;
        self.nodes[id].to = to;
    }

    /// Inserts a leaf into the deepest non-leaf node whose span contains it.
    pub(crate) fn insert_leaf(&mut self, root: usize, leaf: usize) {
        let (from, to) = (self.nodes[leaf].from, self.nodes[leaf].to);
        let mut current = root;

        loop {
            let next = self.nodes[current].children.iter().copied().find(|&c| {
                let n = &self.nodes[c];
                matches!(n.kind, NodeKind::NonTerminal(_))
                    && n.from < n.to
                    && n.from <= from
                    && to <= n.to
            });
            match next {
                Some(child) => current = child,
                None => break,
            }
        }

        let nodes = &self.nodes;
        let position = nodes[current]
            .children
            .iter()
            .position(|&c| nodes[c].from > from)
            .unwrap_or(nodes[current].children.len());
        self.nodes[current].children.insert(position, leaf);
    }

    pub(crate) fn finish(self, grammar: Arc<Grammar>, root: usize) -> Tree {
        Tree {
            grammar,
            nodes: self.nodes,
            root,
        }
    }
}
