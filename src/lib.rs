//! depgraph - directed dependency graphs with a DOT-subset text format
//!
//! This crate models dependency-style graphs (e.g. header include graphs),
//! reads and writes them in a small subset of Graphviz DOT, and reports
//! cycle witnesses for dependency sanity checks.

pub mod dot;
pub mod error;
pub mod export;
pub mod graph;

pub use error::{Error, Result};
pub use graph::{CycleFinder, CycleWitness, DirectedGraph, GraphError, Node};
