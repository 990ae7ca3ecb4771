//! JSON export implementation.
//!
//! Exports cycle analysis results in JSON format for machine-readable output.

use super::{CycleReport, Exporter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable witness for JSON output.
#[derive(Serialize)]
struct JsonWitness<'a> {
    nodes: &'a [String],
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    nodes: usize,
    edges: usize,
    nodes_on_cycles: usize,
    witnesses: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    graph: Option<&'a str>,
    summary: JsonSummary,
    cycles: BTreeMap<&'a str, Vec<JsonWitness<'a>>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, report: &CycleReport, writer: &mut W) -> io::Result<()> {
        let cycles: BTreeMap<&str, Vec<JsonWitness>> = report
            .cycles
            .iter()
            .map(|(id, witnesses)| {
                let witnesses = witnesses
                    .iter()
                    .map(|w| JsonWitness {
                        nodes: &w.nodes,
                        path: w.cycle_path(),
                    })
                    .collect();
                (id.as_str(), witnesses)
            })
            .collect();

        let export = JsonExport {
            graph: report.graph_name.as_deref(),
            summary: JsonSummary {
                nodes: report.node_count,
                edges: report.edge_count,
                nodes_on_cycles: report.cyclic_nodes().count(),
                witnesses: report.witness_count(),
            },
            cycles,
        };

        serde_json::to_writer_pretty(&mut *writer, &export)?;
        writeln!(writer)?;
        Ok(())
    }
}
