//! Parser for the DOT-subset format.
//!
//! The format is line oriented: every non-blank line, once trimmed, holds
//! exactly one of the introducer, a node statement, an edge statement or the
//! closing brace. Comments, multi-line statements and subgraphs are not
//! supported.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::graph::{DirectedGraph, GraphError, Node};

/// Errors that can occur while parsing graph text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first non-blank line is not `digraph "<name>" {`.
    #[error("failed to parse introducer")]
    MissingIntroducer,

    /// The input ended before a closing brace.
    #[error("no closing brace found")]
    MissingCloser,

    /// A line that is neither a statement nor the closing brace.
    #[error("line {line}: no closing brace found, got `{content}`")]
    UnexpectedLine { line: usize, content: String },

    /// A node statement holds an attribute not of the form `key="value"`.
    #[error("line {line}: bad attribute \"{chunk}\"")]
    BadAttribute { line: usize, chunk: String },

    /// A statement violates a graph precondition (duplicate id, undeclared edge endpoint).
    #[error("line {line}: {source}")]
    Graph { line: usize, source: GraphError },
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect("statement pattern compiles"))
        }
    };
}

pattern!(introducer_re, r#"^digraph\s+"([^"]*)"\s*\{$"#);
pattern!(node_re, r"^([A-Za-z0-9_]+)\s*\[(.*)\]\s*;$");
pattern!(bare_node_re, r"^([A-Za-z0-9_]+)\s*;$");
pattern!(edge_re, r"^([A-Za-z0-9_]+)\s*->\s*([A-Za-z0-9_]+)\s*;$");
pattern!(attribute_re, r#"^\s*([A-Za-z0-9_]+)="([^"]*)"\s*(?:,|$)"#);

/// Builds a [`DirectedGraph`] from DOT-subset text.
///
/// Parsing stops at the first error; no partial graph is returned.
///
/// # Example
///
/// ```rust
/// use depgraph::dot::{DotReader, ParseError};
///
/// let graph = DotReader::new()
///     .parse("digraph \"g\" {\n  a [label=\"A\"];\n  b;\n  a -> b;\n}")
///     .unwrap();
/// assert_eq!(graph.node_count(), 2);
///
/// let err = DotReader::new().parse("digraph \"g\" {\n  a;\n").unwrap_err();
/// assert_eq!(err, ParseError::MissingCloser);
/// ```
#[derive(Debug, Default)]
pub struct DotReader {
    graph: DirectedGraph,
}

impl DotReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `data` and returns the graph it describes.
    pub fn parse(mut self, data: &str) -> ParseResult<DirectedGraph> {
        // (1-based line number, trimmed content) for every non-blank line
        let lines: Vec<(usize, &str)> = data
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();

        match lines.first() {
            Some(&(number, line)) if self.parse_introducer(number, line)? => {}
            _ => return Err(ParseError::MissingIntroducer),
        }

        let mut idx = 1;
        while let Some(&(number, line)) = lines.get(idx) {
            if !(self.parse_node_definition(number, line)?
                || self.parse_edge_definition(number, line)?)
            {
                break;
            }
            idx += 1;
        }

        match lines.get(idx) {
            Some(&(_, "}")) => {}
            Some(&(number, line)) => {
                return Err(ParseError::UnexpectedLine {
                    line: number,
                    content: line.to_string(),
                })
            }
            None => return Err(ParseError::MissingCloser),
        }

        if let Some(&(number, _)) = lines.get(idx + 1) {
            warn!(line = number, "ignoring content after closing brace");
        }
        debug!(
            name = self.graph.name().unwrap_or_default(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "parsed graph"
        );
        Ok(self.graph)
    }

    fn parse_introducer(&mut self, number: usize, line: &str) -> ParseResult<bool> {
        let Some(caps) = introducer_re().captures(line) else {
            return Ok(false);
        };
        self.graph
            .set_name(&caps[1])
            .map_err(|source| ParseError::Graph { line: number, source })?;
        Ok(true)
    }

    fn parse_node_definition(&mut self, number: usize, line: &str) -> ParseResult<bool> {
        let node = if let Some(caps) = node_re().captures(line) {
            let attributes =
                parse_attributes(&caps[2]).map_err(|chunk| ParseError::BadAttribute {
                    line: number,
                    chunk,
                })?;
            attributes
                .into_iter()
                .fold(Node::new(&caps[1]), |node, (k, v)| node.with_attribute(k, v))
        } else if let Some(caps) = bare_node_re().captures(line) {
            Node::new(&caps[1])
        } else {
            return Ok(false);
        };

        self.graph
            .add_node(node)
            .map_err(|source| ParseError::Graph { line: number, source })?;
        Ok(true)
    }

    fn parse_edge_definition(&mut self, number: usize, line: &str) -> ParseResult<bool> {
        let Some(caps) = edge_re().captures(line) else {
            return Ok(false);
        };
        self.graph
            .add_edge(&caps[1], &caps[2])
            .map_err(|source| ParseError::Graph { line: number, source })?;
        Ok(true)
    }
}

/// Splits a bracketed attribute list into `(key, value)` pairs.
///
/// On failure returns the offending chunk, i.e. the text from the point of
/// failure up to the next comma.
fn parse_attributes(raw: &str) -> Result<Vec<(String, String)>, String> {
    let mut attributes = Vec::new();
    let mut rest = raw;

    loop {
        let Some(caps) = attribute_re().captures(rest) else {
            let chunk = rest.split(',').next().unwrap_or(rest);
            return Err(chunk.trim().to_string());
        };
        attributes.push((caps[1].to_string(), caps[2].to_string()));

        let consumed = caps.get(0).map_or(rest.len(), |m| m.end());
        rest = &rest[consumed..];
        // a trailing comma is tolerated
        if rest.trim().is_empty() {
            return Ok(attributes);
        }
    }
}
