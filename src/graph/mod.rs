//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DirectedGraph`] struct, an id-keyed directed
//! graph with string attributes, and [`CycleFinder`] for reporting cycles.
//!
//! # Example
//!
//! ```rust
//! use depgraph::graph::{DirectedGraph, Node};
//!
//! let mut graph = DirectedGraph::with_name("libcxx").unwrap();
//! graph.add_node(Node::with_label("vector", "<vector>")).unwrap();
//! graph.add_node(Node::with_label("memory", "<memory>")).unwrap();
//! graph.add_edge("vector", "memory").unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert!(!graph.has_cycles());
//! ```

mod cycles;
mod directed_graph;

pub use cycles::{CycleFinder, CycleWitness, TraversalQueue};
pub use directed_graph::{DirectedGraph, GraphError, GraphResult, Node, LABEL};
