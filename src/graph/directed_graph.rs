//! Directed graph implementation using petgraph.
//!
//! Nodes are keyed by a textual id and carry a string attribute map. Edges
//! live in a `StableDiGraph`, so node indices stay valid across removals and
//! removing a node drops every edge touching it.

use petgraph::algo::is_cyclic_directed;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::cycles::{CycleFinder, CycleWitness};
use crate::dot::{DotEmitter, DotReader, ParseError, ParseResult};
use crate::error::Result;

/// Attribute key holding a node's human-readable name.
pub const LABEL: &str = "label";

/// Caller-contract violations raised by graph mutation and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A node with the same id is already resident.
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    /// The referenced node is not part of the graph.
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    /// More than one node carries the requested label.
    #[error("label '{label}' is ambiguous: {count} nodes carry it")]
    AmbiguousLabel { label: String, count: usize },

    /// Node ids must be one or more of `[A-Za-z0-9_]`.
    #[error("invalid node id '{0}': expected letters, digits or underscores")]
    InvalidId(String),

    /// Attribute keys follow the id rules; values may not hold quotes or line breaks.
    #[error("invalid attribute {key}=\"{value}\" on node '{node}'")]
    InvalidAttribute {
        node: String,
        key: String,
        value: String,
    },

    /// Graph names may not hold quotes or line breaks.
    #[error("invalid graph name '{0}'")]
    InvalidName(String),
}

/// Result type alias for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn is_quotable(s: &str) -> bool {
    !s.contains(|c| matches!(c, '"' | '\n' | '\r'))
}

/// A vertex of a [`DirectedGraph`].
///
/// Two nodes are equal when their ids are equal; attributes do not take
/// part in comparison or hashing. Outgoing edges are owned by the graph
/// and queried through [`DirectedGraph::successors`].
///
/// # Example
///
/// ```rust
/// use depgraph::graph::Node;
///
/// let node = Node::with_label("vector", "<vector>").with_attribute("shape", "box");
/// assert_eq!(node.id(), "vector");
/// assert_eq!(node.label(), Some("<vector>"));
/// assert_eq!(node.to_string(), "<vector>");
/// ```
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    attributes: BTreeMap<String, String>,
}

impl Node {
    /// Creates a node with no attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a node carrying a `label` attribute.
    pub fn with_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id).with_attribute(LABEL, label)
    }

    /// Adds or replaces an attribute, builder style.
    ///
    /// Keys and values are checked when the node is added to a graph.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The node's unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `label` attribute, if set.
    pub fn label(&self) -> Option<&str> {
        self.attribute(LABEL)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// All attributes, ordered by key.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    fn validate(&self) -> GraphResult<()> {
        if !is_identifier(&self.id) {
            return Err(GraphError::InvalidId(self.id.clone()));
        }
        for (key, value) in &self.attributes {
            check_attribute(&self.id, key, value)?;
        }
        Ok(())
    }
}

fn check_attribute(node: &str, key: &str, value: &str) -> GraphResult<()> {
    if is_identifier(key) && is_quotable(value) {
        Ok(())
    } else {
        Err(GraphError::InvalidAttribute {
            node: node.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Lets a node handle stand in wherever an id is accepted.
impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().unwrap_or(&self.id))
    }
}

/// A named directed graph of [`Node`]s.
///
/// Ids are unique, every edge joins two resident nodes, and at most one
/// edge exists per ordered pair (self-loops allowed). A graph is not
/// synchronized; callers sharing one across threads must serialize access.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{DirectedGraph, Node};
///
/// let mut graph = DirectedGraph::with_name("headers").unwrap();
/// graph.add_node(Node::with_label("vector", "<vector>")).unwrap();
/// graph.add_node(Node::with_label("memory", "<memory>")).unwrap();
/// graph.add_edge("vector", "memory").unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    name: Option<String>,
    /// Node storage; edge weights are unused
    graph: StableDiGraph<Node, ()>,
    /// Maps node ids to their indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl DirectedGraph {
    /// Creates an empty, unnamed graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given name.
    pub fn with_name(name: impl Into<String>) -> GraphResult<Self> {
        let mut graph = Self::new();
        graph.set_name(name)?;
        Ok(graph)
    }

    /// Creates an unnamed graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            name: None,
            graph: StableDiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the graph name.
    ///
    /// Fails with [`GraphError::InvalidName`] if the name holds a double
    /// quote or a line break, since it could not be written back out.
    pub fn set_name(&mut self, name: impl Into<String>) -> GraphResult<()> {
        let name = name.into();
        if !is_quotable(&name) {
            return Err(GraphError::InvalidName(name));
        }
        self.name = Some(name);
        Ok(())
    }

    /// Inserts a node.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if the id is taken, or an invalid id/attribute error.
    pub fn add_node(&mut self, node: Node) -> GraphResult<()> {
        node.validate()?;
        if self.node_indices.contains_key(node.id()) {
            return Err(GraphError::DuplicateNode(node.id));
        }

        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        Ok(())
    }

    /// Adds an edge from `from` to `to`.
    ///
    /// Either endpoint may be given as an id or a [`Node`] handle. Adding an
    /// existing edge is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the edge is new, `false` if it was already present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::graph::{DirectedGraph, GraphError, Node};
    ///
    /// let mut graph = DirectedGraph::new();
    /// let a = Node::new("a");
    /// graph.add_node(a.clone()).unwrap();
    /// graph.add_node(Node::new("b")).unwrap();
    ///
    /// assert_eq!(graph.add_edge(&a, "b"), Ok(true));
    /// assert_eq!(graph.add_edge("a", "b"), Ok(false));
    /// assert_eq!(
    ///     graph.add_edge("a", "missing"),
    ///     Err(GraphError::NodeNotFound("missing".into()))
    /// );
    /// ```
    pub fn add_edge(&mut self, from: impl AsRef<str>, to: impl AsRef<str>) -> GraphResult<bool> {
        let from_idx = self.require(from.as_ref())?;
        let to_idx = self.require(to.as_ref())?;

        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(from_idx, to_idx, ());
        Ok(true)
    }

    /// Removes a node and every edge into or out of it.
    ///
    /// # Returns
    ///
    /// The removed node, or [`GraphError::NodeNotFound`].
    pub fn remove_node(&mut self, node: impl AsRef<str>) -> GraphResult<Node> {
        let id = node.as_ref();
        let idx = self
            .node_indices
            .remove(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        self.graph
            .remove_node(idx)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Gets a node by id; `None` when absent.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Gets the single node whose `label` equals `label`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no node matches, or [`GraphError::AmbiguousLabel`]
    /// when more than one does.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::graph::{DirectedGraph, Node};
    ///
    /// let mut graph = DirectedGraph::new();
    /// graph.add_node(Node::with_label("a", "<string>")).unwrap();
    ///
    /// assert_eq!(graph.get_node_by_label("<string>").unwrap().unwrap().id(), "a");
    /// assert!(graph.get_node_by_label("<map>").unwrap().is_none());
    /// ```
    pub fn get_node_by_label(&self, label: &str) -> GraphResult<Option<&Node>> {
        let matches: Vec<&Node> = self
            .graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .filter(|node| node.label() == Some(label))
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [node] => Ok(Some(*node)),
            _ => Err(GraphError::AmbiguousLabel {
                label: label.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Sets an attribute on a resident node.
    ///
    /// # Returns
    ///
    /// The previous value of the attribute, if any.
    pub fn set_attribute(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> GraphResult<Option<String>> {
        let (key, value) = (key.into(), value.into());
        check_attribute(id, &key, &value)?;
        let idx = self.require(id)?;
        Ok(self.graph[idx].attributes.insert(key, value))
    }

    /// Nodes `id` has an edge to, ordered by id.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::graph::{DirectedGraph, Node};
    ///
    /// let mut graph = DirectedGraph::new();
    /// for id in ["app", "log", "net"] {
    ///     graph.add_node(Node::new(id)).unwrap();
    /// }
    /// graph.add_edge("app", "net").unwrap();
    /// graph.add_edge("app", "log").unwrap();
    ///
    /// let ids: Vec<&str> = graph.successors("app").iter().map(|n| n.id()).collect();
    /// assert_eq!(ids, ["log", "net"]);
    /// ```
    pub fn successors(&self, id: &str) -> Vec<&Node> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Nodes with an edge to `id`, ordered by id.
    pub fn predecessors(&self, id: &str) -> Vec<&Node> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&Node> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };

        let mut nodes: Vec<&Node> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self
            .graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// All edges as `(source, target)` pairs, ordered by source then target id.
    pub fn edges(&self) -> Vec<(&Node, &Node)> {
        let mut edges: Vec<(&Node, &Node)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (&self.graph[a], &self.graph[b]))
            .collect();
        edges.sort_by(|(a1, b1), (a2, b2)| (&a1.id, &b1.id).cmp(&(&a2.id, &b2.id)));
        edges
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks whether any cycle exists, without collecting witnesses.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Cycle witnesses for every node, keyed by starting node id.
    ///
    /// See [`CycleFinder`] for what a witness is and what it may miss.
    pub fn find_cycles(&self) -> BTreeMap<String, Vec<CycleWitness>> {
        CycleFinder::new(self).find_cycles_in_graph()
    }

    /// Ids of every node appearing in some cycle witness.
    pub fn nodes_in_cycles(&self) -> BTreeSet<String> {
        self.find_cycles()
            .into_values()
            .flatten()
            .flat_map(|witness| witness.nodes)
            .collect()
    }

    /// Serializes the graph to the DOT-subset text format.
    ///
    /// Node statements come first in ascending id order, then edge
    /// statements. An unnamed graph is written with an empty name.
    pub fn to_dot(&self) -> String {
        let mut dot = DotEmitter::new(self.name().unwrap_or_default());
        for node in self.graph.node_indices().map(|idx| &self.graph[idx]) {
            dot.add_node(node);
        }
        for (from, to) in self.edges() {
            dot.add_edge(from, to);
        }
        dot.emit()
    }

    /// Parses a graph from the DOT-subset text format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::graph::DirectedGraph;
    ///
    /// let graph = DirectedGraph::from_dot(
    ///     "digraph \"g\" {\n  a [label=\"A\"];\n  b [label=\"B\"];\n  a -> b;\n}\n",
    /// )
    /// .unwrap();
    /// assert_eq!(graph.name(), Some("g"));
    /// assert!(graph.contains_edge("a", "b"));
    /// ```
    pub fn from_dot(text: &str) -> ParseResult<Self> {
        DotReader::new().parse(text)
    }

    /// Reads and parses a whole file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let graph = Self::from_dot(&content)?;
        debug!(
            path = %path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded graph"
        );
        Ok(graph)
    }

    /// Serializes the graph and writes it to `path`, replacing any content.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_dot())?;
        debug!(
            path = %path.display(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "saved graph"
        );
        Ok(())
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Outgoing neighbors of `idx`, ordered by id so traversals are reproducible.
    pub(crate) fn successor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        next.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
        next
    }

    fn require(&self, id: &str) -> GraphResult<NodeIndex> {
        self.index_of(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }
}

impl fmt::Display for DirectedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot())
    }
}

impl FromStr for DirectedGraph {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_dot(s)
    }
}
