//! Breadth-first cycle witnesses.
//!
//! [`CycleFinder`] runs one breadth-first traversal per starting node and
//! reports every first-discovered path that leads back to the start. This is
//! a sanity check for dependency graphs, not an exhaustive enumeration of
//! simple cycles: each node is reached at most once per traversal, so
//! distinct cycles sharing a start node and a path prefix may collapse into
//! a single witness.

use petgraph::stable_graph::NodeIndex;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use tracing::trace;

use super::directed_graph::{DirectedGraph, GraphError, GraphResult};

/// Breadth-first frontier: a visited set plus a FIFO of pending nodes.
///
/// # Example
///
/// ```rust
/// use depgraph::graph::TraversalQueue;
///
/// let mut queue = TraversalQueue::new();
/// queue.push_back("a");
/// assert!(!queue.maybe_push_back("a"));
/// assert!(queue.maybe_push_back("b"));
///
/// assert_eq!(queue.pop_front(), Some("a"));
/// assert!(queue.seen(&"a"));
/// assert_eq!(queue.pop_front(), Some("b"));
/// assert_eq!(queue.pop_front(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TraversalQueue<N> {
    visited: HashSet<N>,
    pending: VecDeque<N>,
}

impl<N> Default for TraversalQueue<N> {
    fn default() -> Self {
        Self {
            visited: HashSet::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> TraversalQueue<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `node` visited and enqueues it.
    ///
    /// # Panics
    ///
    /// If `node` was already visited. Use [`maybe_push_back`](Self::maybe_push_back)
    /// when that can happen.
    pub fn push_back(&mut self, node: N) {
        assert!(
            self.visited.insert(node),
            "node pushed onto traversal queue twice"
        );
        self.pending.push_back(node);
    }

    /// Enqueues `node` unless it was visited; returns whether it was pushed.
    pub fn maybe_push_back(&mut self, node: N) -> bool {
        if self.seen(&node) {
            return false;
        }
        self.push_back(node);
        true
    }

    /// Dequeues the oldest pending node, or `None` once the frontier is exhausted.
    pub fn pop_front(&mut self) -> Option<N> {
        self.pending.pop_front()
    }

    pub fn seen(&self, node: &N) -> bool {
        self.visited.contains(node)
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending nodes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// A path from a start node back to itself.
///
/// `nodes` begins with the start node and ends with the node whose edge
/// returns to it; the closing edge is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleWitness {
    /// Node ids in traversal order
    pub nodes: Vec<String>,
}

impl CycleWitness {
    /// The node the witness starts and ends at.
    pub fn start(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    /// Returns the path with the closing edge spelled out.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        format!("{} -> {}", self.nodes.join(" -> "), first)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Finds cycle witnesses in a [`DirectedGraph`].
///
/// # Example
///
/// ```rust
/// use depgraph::graph::{CycleFinder, DirectedGraph, Node};
///
/// let mut graph = DirectedGraph::new();
/// for id in ["a", "b", "c"] {
///     graph.add_node(Node::new(id)).unwrap();
/// }
/// graph.add_edge("a", "b").unwrap();
/// graph.add_edge("b", "c").unwrap();
/// graph.add_edge("c", "a").unwrap();
///
/// let witnesses = CycleFinder::new(&graph).find_cycles_for_node("a").unwrap();
/// assert_eq!(witnesses[0].cycle_path(), "a -> b -> c -> a");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CycleFinder<'g> {
    graph: &'g DirectedGraph,
}

impl<'g> CycleFinder<'g> {
    pub fn new(graph: &'g DirectedGraph) -> Self {
        Self { graph }
    }

    /// Witnesses for cycles through `id`.
    ///
    /// Traverses breadth-first from `id`, remembering the first path that
    /// reaches each node. Whenever the node being expanded has an edge back
    /// to `id`, its path is recorded. Successors are expanded in id order.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if `id` is not in the graph.
    pub fn find_cycles_for_node(&self, id: &str) -> GraphResult<Vec<CycleWitness>> {
        let start = self
            .graph
            .index_of(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        Ok(self.witnesses_from(start))
    }

    /// Witnesses for every node, keyed by starting node id.
    ///
    /// Nodes with no path back to themselves map to an empty list.
    pub fn find_cycles_in_graph(&self) -> BTreeMap<String, Vec<CycleWitness>> {
        self.graph
            .nodes()
            .into_iter()
            .filter_map(|node| {
                let start = self.graph.index_of(node.id())?;
                Some((node.id().to_string(), self.witnesses_from(start)))
            })
            .collect()
    }

    fn witnesses_from(&self, start: NodeIndex) -> Vec<CycleWitness> {
        let mut queue = TraversalQueue::new();
        let mut paths: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut witnesses = Vec::new();

        queue.push_back(start);
        paths.insert(start, vec![start]);

        while let Some(current) = queue.pop_front() {
            let path = paths.get(&current).cloned().unwrap_or_default();
            trace!(
                start = self.graph.node_at(start).id(),
                node = self.graph.node_at(current).id(),
                depth = path.len(),
                "expanding"
            );

            for next in self.graph.successor_indices(current) {
                if queue.maybe_push_back(next) {
                    let mut extended = path.clone();
                    extended.push(next);
                    paths.insert(next, extended);
                }
                if next == start {
                    witnesses.push(self.witness(&path));
                }
            }
        }

        witnesses
    }

    fn witness(&self, path: &[NodeIndex]) -> CycleWitness {
        CycleWitness {
            nodes: path
                .iter()
                .map(|&idx| self.graph.node_at(idx).id().to_string())
                .collect(),
        }
    }
}
