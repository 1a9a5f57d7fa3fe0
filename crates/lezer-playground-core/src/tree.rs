//! Serializable parse tree.
//!
//! A [`ParseTreeNode`] is a named span with ordered children. Spans are byte
//! offsets into the specimen. Two JSON shapes are supported:
//!
//! - the plain derive: `{ name, from, to, children }`
//! - [`ValuedTree`]: `{ type, from, to, value, children }`, where `value` is the
//!   covered slice of the source text

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize, Serializer};

use crate::Colors;

/// Node name used by the runtime for error recovery regions.
pub const ERROR_NODE_NAME: &str = "⚠";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseTreeNode {
    pub name: String,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub children: Vec<ParseTreeNode>,
}

/// First violation of the span nesting rules found by [`ParseTreeNode::check_nesting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestingViolation {
    /// `from > to`.
    InvertedSpan { name: String, from: usize, to: usize },
    /// Child span is not contained in the parent span.
    Escapes { parent: String, child: String },
    /// Child starts before its previous sibling.
    OutOfOrder { parent: String, child: String },
}

impl fmt::Display for NestingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedSpan { name, from, to } => {
                write!(f, "node `{name}` has inverted span {from}..{to}")
            }
            Self::Escapes { parent, child } => {
                write!(f, "child `{child}` escapes the span of `{parent}`")
            }
            Self::OutOfOrder { parent, child } => {
                write!(f, "child `{child}` of `{parent}` is out of document order")
            }
        }
    }
}

impl ParseTreeNode {
    pub fn new(name: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ParseTreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_error(&self) -> bool {
        self.name == ERROR_NODE_NAME
    }

    /// Total number of nodes, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Whether any node in the tree is an error node.
    pub fn has_errors(&self) -> bool {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_error() {
                return true;
            }
            stack.extend(node.children.iter());
        }
        false
    }

    /// Verifies `from <= to`, containment in the parent, and document order of siblings.
    pub fn check_nesting(&self) -> Result<(), NestingViolation> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.from > node.to {
                return Err(NestingViolation::InvertedSpan {
                    name: node.name.clone(),
                    from: node.from,
                    to: node.to,
                });
            }

            let mut prev_from = node.from;
            for child in &node.children {
                if child.from < node.from || child.to > node.to {
                    return Err(NestingViolation::Escapes {
                        parent: node.name.clone(),
                        child: child.name.clone(),
                    });
                }
                if child.from < prev_from {
                    return Err(NestingViolation::OutOfOrder {
                        parent: node.name.clone(),
                        child: child.name.clone(),
                    });
                }
                prev_from = child.from;
                stack.push(child);
            }
        }
        Ok(())
    }

    pub fn printer(&self) -> TreePrinter<'_, '_> {
        TreePrinter::new(self)
    }

    /// View that serializes with `type` and `value` keys.
    pub fn with_values<'t>(&'t self, source: &'t str) -> ValuedTree<'t> {
        ValuedTree { node: self, source }
    }

    /// Format the tree as colored JSON.
    ///
    /// Color scheme (jq-inspired):
    /// - Keys: Blue
    /// - Node names: Green
    /// - Numbers: Normal
    /// - Structure `{}[]:,`: Dim
    pub fn format_json(&self, pretty: bool, colors: Colors) -> String {
        let mut out = String::new();
        format_json_node(&mut out, self, &colors, pretty, 0);
        out
    }
}

/// Builder for the indented text rendering of a tree.
pub struct TreePrinter<'t, 's> {
    tree: &'t ParseTreeNode,
    source: Option<&'s str>,
    spans: bool,
    colored: bool,
}

impl<'t, 's> TreePrinter<'t, 's> {
    pub fn new(tree: &'t ParseTreeNode) -> Self {
        Self {
            tree,
            source: None,
            spans: true,
            colored: false,
        }
    }

    /// Show the covered text of leaf nodes.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        let c = Colors::new(self.colored);
        let mut stack = vec![(self.tree, 0usize)];

        while let Some((node, indent)) = stack.pop() {
            let name_color = if node.is_error() { c.error } else { c.name };
            write!(w, "{}{}{}{}", "  ".repeat(indent), name_color, node.name, c.reset)?;

            if self.spans {
                write!(w, " {}{}..{}{}", c.muted, node.from, node.to, c.reset)?;
            }

            if node.children.is_empty()
                && let Some(text) = self.source.and_then(|s| s.get(node.from..node.to))
            {
                write!(w, " {}{:?}{}", c.text, text, c.reset)?;
            }

            writeln!(w)?;

            for child in node.children.iter().rev() {
                stack.push((child, indent + 1));
            }
        }

        Ok(())
    }
}

/// Serializes as `{ type, from, to, value, children }`.
#[derive(Debug, Clone, Copy)]
pub struct ValuedTree<'t> {
    node: &'t ParseTreeNode,
    source: &'t str,
}

impl Serialize for ValuedTree<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let value = self.source.get(self.node.from..self.node.to).unwrap_or("");
        let children: Vec<ValuedTree<'_>> = self
            .node
            .children
            .iter()
            .map(|child| child.with_values(self.source))
            .collect();

        let mut s = serializer.serialize_struct("ValuedTree", 5)?;
        s.serialize_field("type", &self.node.name)?;
        s.serialize_field("from", &self.node.from)?;
        s.serialize_field("to", &self.node.to)?;
        s.serialize_field("value", value)?;
        s.serialize_field("children", &children)?;
        s.end()
    }
}

fn format_json_node(out: &mut String, node: &ParseTreeNode, c: &Colors, pretty: bool, indent: usize) {
    out.push_str(c.muted);
    out.push('{');
    out.push_str(c.reset);

    let field_indent = if pretty { indent + 2 } else { 0 };

    format_key(out, "name", c, pretty, field_indent);
    out.push_str(c.text);
    out.push('"');
    out.push_str(&escape_json_string(&node.name));
    out.push('"');
    out.push_str(c.reset);

    format_separator(out, c);
    format_key(out, "from", c, pretty, field_indent);
    out.push_str(&node.from.to_string());

    format_separator(out, c);
    format_key(out, "to", c, pretty, field_indent);
    out.push_str(&node.to.to_string());

    format_separator(out, c);
    format_key(out, "children", c, pretty, field_indent);
    format_children(out, &node.children, c, pretty, field_indent);

    if pretty {
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }

    out.push_str(c.muted);
    out.push('}');
    out.push_str(c.reset);
}

fn format_children(
    out: &mut String,
    children: &[ParseTreeNode],
    c: &Colors,
    pretty: bool,
    indent: usize,
) {
    out.push_str(c.muted);
    out.push('[');
    out.push_str(c.reset);

    if children.is_empty() {
        out.push_str(c.muted);
        out.push(']');
        out.push_str(c.reset);
        return;
    }

    let elem_indent = if pretty { indent + 2 } else { 0 };

    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            format_separator(out, c);
        }
        if pretty {
            out.push('\n');
            out.push_str(&" ".repeat(elem_indent));
        }
        format_json_node(out, child, c, pretty, elem_indent);
    }

    if pretty {
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }

    out.push_str(c.muted);
    out.push(']');
    out.push_str(c.reset);
}

fn format_key(out: &mut String, key: &str, c: &Colors, pretty: bool, indent: usize) {
    if pretty {
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }
    out.push_str(c.name);
    out.push('"');
    out.push_str(key);
    out.push('"');
    out.push_str(c.reset);
    out.push_str(c.muted);
    out.push(':');
    out.push_str(c.reset);
    if pretty {
        out.push(' ');
    }
}

fn format_separator(out: &mut String, c: &Colors) {
    out.push_str(c.muted);
    out.push(',');
    out.push_str(c.reset);
}

fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
