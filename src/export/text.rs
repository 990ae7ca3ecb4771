//! Plain text export implementation.
//!
//! Lists each starting node with the witness paths found for it.

use super::{CycleReport, Exporter};
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, report: &CycleReport, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "graph \"{}\": {}, {}",
            report.graph_name.as_deref().unwrap_or_default(),
            count(report.node_count, "node"),
            count(report.edge_count, "edge")
        )?;

        if !report.has_cycles() {
            writeln!(writer, "No cycles found.")?;
            return Ok(());
        }

        let cyclic = report.cyclic_nodes().count();
        writeln!(
            writer,
            "{} of {} on a cycle:",
            cyclic,
            count(report.node_count, "node")
        )?;
        for (id, witnesses) in report.cyclic_nodes() {
            for witness in witnesses {
                writeln!(writer, "  {}: {}", id, witness.cycle_path())?;
            }
        }

        Ok(())
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}
