use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depgraph::export::{self, CycleReport, ReportFormat};
use depgraph::DirectedGraph;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(version, about = "Inspect dependency graphs stored as DOT-subset text", long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a graph file and print its size
    Check {
        /// Graph file to read
        file: PathBuf,
    },
    /// Rewrite a graph file in normalized form
    Fmt {
        /// Graph file to read
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report cycle witnesses (exits with status 1 if any are found)
    Cycles {
        /// Graph file to read
        file: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },
    /// Remove nodes and every edge touching them
    Remove {
        /// Graph file to read
        file: PathBuf,

        /// Ids of the nodes to remove
        #[arg(required = true)]
        ids: Vec<String>,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Check { file } => {
            let graph = load(&file)?;
            println!(
                "{}: graph \"{}\" (nodes: {}, edges: {})",
                file.display(),
                graph.name().unwrap_or_default(),
                graph.node_count(),
                graph.edge_count()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fmt { file, output } => {
            let graph = load(&file)?;
            emit(&graph, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Cycles { file, format } => {
            let graph = load(&file)?;
            let report = CycleReport::new(&graph);
            export::export(format, &report, &mut io::stdout().lock())
                .context("failed to write report")?;
            Ok(if report.has_cycles() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Remove { file, ids, output } => {
            let mut graph = load(&file)?;
            for id in &ids {
                graph
                    .remove_node(id)
                    .with_context(|| format!("cannot remove '{}'", id))?;
                info!(id = %id, "removed node");
            }
            emit(&graph, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(path: &Path) -> Result<DirectedGraph> {
    DirectedGraph::load_from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn emit(graph: &DirectedGraph, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => graph
            .save_to_file(path)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{}", graph.to_dot());
            Ok(())
        }
    }
}
