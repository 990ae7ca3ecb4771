//! Export functionality for cycle analysis results.
//!
//! This module renders the outcome of cycle detection in two formats:
//! plain text for terminals and JSON for other tools.

pub mod json;
pub mod text;

use crate::graph::{CycleWitness, DirectedGraph};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "Unknown report format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Cycle witnesses for a whole graph, plus the graph's headline numbers.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Graph name, if it has one
    pub graph_name: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
    /// Witnesses keyed by starting node id; empty lists for nodes on no cycle
    pub cycles: BTreeMap<String, Vec<CycleWitness>>,
}

impl CycleReport {
    /// Runs cycle detection over `graph`.
    pub fn new(graph: &DirectedGraph) -> Self {
        Self {
            graph_name: graph.name().map(str::to_string),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            cycles: graph.find_cycles(),
        }
    }

    /// True if any node has at least one witness.
    pub fn has_cycles(&self) -> bool {
        self.cycles.values().any(|w| !w.is_empty())
    }

    /// Total number of witnesses across all start nodes.
    pub fn witness_count(&self) -> usize {
        self.cycles.values().map(Vec::len).sum()
    }

    /// Start nodes with at least one witness, in id order.
    pub fn cyclic_nodes(&self) -> impl Iterator<Item = (&str, &[CycleWitness])> {
        self.cycles
            .iter()
            .filter(|(_, w)| !w.is_empty())
            .map(|(id, w)| (id.as_str(), w.as_slice()))
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the report to the given writer.
    fn export<W: Write>(&self, report: &CycleReport, writer: &mut W) -> io::Result<()>;
}

/// Export the report in the specified format.
pub fn export<W: Write>(
    format: ReportFormat,
    report: &CycleReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => text::TextExporter.export(report, writer),
        ReportFormat::Json => json::JsonExporter.export(report, writer),
    }
}

/// Export the report to a string.
pub fn export_to_string(format: ReportFormat, report: &CycleReport) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    pub(super) fn cyclic_graph() -> DirectedGraph {
        let mut graph = DirectedGraph::with_name("deps").unwrap();
        for id in ["a", "b", "c", "d"] {
            graph.add_node(Node::new(id)).unwrap();
        }
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "a").unwrap();
        graph.add_edge("c", "a").unwrap();
        graph.add_edge("d", "d").unwrap();
        graph
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("TXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_report_format_display() {
        assert_eq!(format!("{}", ReportFormat::Text), "text");
        assert_eq!(format!("{}", ReportFormat::Json), "json");
    }

    #[test]
    fn test_cycle_report_counts() {
        let report = CycleReport::new(&cyclic_graph());

        assert_eq!(report.graph_name.as_deref(), Some("deps"));
        assert_eq!(report.node_count, 4);
        assert_eq!(report.edge_count, 4);
        assert!(report.has_cycles());
        assert_eq!(report.witness_count(), 3);

        let cyclic: Vec<&str> = report.cyclic_nodes().map(|(id, _)| id).collect();
        assert_eq!(cyclic, ["a", "b", "d"]);
    }

    #[test]
    fn test_export_to_string_text() {
        let report = CycleReport::new(&cyclic_graph());
        let text = export_to_string(ReportFormat::Text, &report).unwrap();

        assert!(text.starts_with("graph \"deps\": 4 nodes, 4 edges\n"));
        assert!(text.contains("  d: d -> d\n"));
    }

    #[test]
    fn test_export_to_string_json() {
        let report = CycleReport::new(&cyclic_graph());
        let json = export_to_string(ReportFormat::Json, &report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["graph"], "deps");
        assert_eq!(value["summary"]["witnesses"], 3);
        assert_eq!(value["cycles"]["a"][0]["path"], "a -> b -> a");
    }

    #[test]
    fn test_cycle_report_acyclic() {
        let mut graph = DirectedGraph::new();
        graph.add_node(Node::new("a")).unwrap();
        let report = CycleReport::new(&graph);

        assert!(!report.has_cycles());
        assert_eq!(report.witness_count(), 0);
        assert_eq!(report.cycles.len(), 1);
    }
}
