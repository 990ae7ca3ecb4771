//! Crate-level error type for file operations.
//!
//! Parsing and graph mutation each have their own error enum; this type
//! joins them with I/O failures for [`DirectedGraph::load_from_file`] and
//! [`DirectedGraph::save_to_file`].
//!
//! [`DirectedGraph::load_from_file`]: crate::graph::DirectedGraph::load_from_file
//! [`DirectedGraph::save_to_file`]: crate::graph::DirectedGraph::save_to_file

use thiserror::Error;

use crate::dot::ParseError;
use crate::graph::GraphError;

/// Result type for file-backed graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not valid graph text
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A graph precondition was violated
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}
