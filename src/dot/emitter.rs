//! Serializer for the DOT-subset format.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::Node;

/// Collects node and edge statements and renders them as one document.
///
/// Node statements are emitted in ascending id order, followed by edge
/// statements ordered by source then target id, so equal graphs always
/// produce identical text.
///
/// # Example
///
/// ```rust
/// use depgraph::dot::DotEmitter;
/// use depgraph::graph::Node;
///
/// let a = Node::with_label("a", "A");
/// let b = Node::new("b");
///
/// let mut dot = DotEmitter::new("g");
/// dot.add_node(&b);
/// dot.add_node(&a);
/// dot.add_edge(&a, &b);
///
/// assert_eq!(
///     dot.emit(),
///     "digraph \"g\" {\n  a [label=\"A\"];\n  b;\n  a -> b;\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct DotEmitter {
    name: String,
    node_statements: BTreeMap<String, String>,
    edge_statements: BTreeSet<(String, String)>,
}

impl DotEmitter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Records the statement for `node`, replacing any earlier one with the same id.
    pub fn add_node(&mut self, node: &Node) {
        let statement = if node.attributes().is_empty() {
            format!("{};", node.id())
        } else {
            let attrs: Vec<String> = node
                .attributes()
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, v))
                .collect();
            format!("{} [{}];", node.id(), attrs.join(", "))
        };
        self.node_statements.insert(node.id().to_string(), statement);
    }

    pub fn add_edge(&mut self, from: &Node, to: &Node) {
        self.edge_statements
            .insert((from.id().to_string(), to.id().to_string()));
    }

    /// Renders the document, newline-terminated.
    pub fn emit(&self) -> String {
        let mut lines =
            Vec::with_capacity(self.node_statements.len() + self.edge_statements.len() + 2);
        lines.push(format!("digraph \"{}\" {{", self.name));
        for statement in self.node_statements.values() {
            lines.push(format!("  {}", statement));
        }
        for (from, to) in &self.edge_statements {
            lines.push(format!("  {} -> {};", from, to));
        }
        lines.push("}".to_string());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
