//! `agt graph`: deployment order or Graphviz DOT.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "A depends on B". The deployment order lists every
//! identifier after everything it depends on.

use std::io::{self, Write};

use agtron_core::config::EffectiveConfig;
use agtron_core::{ConstraintType, DependencyGraph};
use clap::Args;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use super::load_system;
use crate::output::{OutputMode, pretty_section, render, render_mode};

/// Arguments for `agt graph`.
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    /// Print the graph as Graphviz DOT instead of a deployment order.
    #[arg(long)]
    pub dot: bool,
}

#[derive(Debug, Serialize)]
struct EdgeOut {
    origin: String,
    dependent: String,
    #[serde(rename = "type")]
    kind: ConstraintType,
}

#[derive(Debug, Serialize)]
struct GraphReport {
    nodes: usize,
    edges: Vec<EdgeOut>,
    /// Identifiers nothing depends on.
    entry_points: Vec<String>,
    /// Dependencies before dependents.
    order: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DotOutput {
    dot: String,
}

fn build_report(graph: &DependencyGraph) -> anyhow::Result<GraphReport> {
    let order = graph
        .deployment_order()
        .ok_or_else(|| anyhow::anyhow!("dependency graph has a cycle"))?;

    let edges = graph
        .graph
        .edge_references()
        .map(|edge| EdgeOut {
            origin: graph.name(edge.source()).unwrap_or_default().to_string(),
            dependent: graph.name(edge.target()).unwrap_or_default().to_string(),
            kind: *edge.weight(),
        })
        .collect();

    Ok(GraphReport {
        nodes: graph.node_count(),
        edges,
        entry_points: graph.entry_points().into_iter().map(str::to_string).collect(),
        order: order.into_iter().map(str::to_string).collect(),
    })
}

/// Execute `agt graph`.
pub fn run_graph(args: &GraphArgs, config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<()> {
    let system = load_system(config, output)?;
    let graph = DependencyGraph::from_system(&system);

    if args.dot {
        let payload = DotOutput {
            dot: graph.to_dot(),
        };
        return render(output, &payload, |p, w| write!(w, "{}", p.dot));
    }

    let report = build_report(&graph)?;
    render_mode(output, &report, render_graph_text, render_graph_pretty)
}

fn render_graph_text(report: &GraphReport, w: &mut dyn Write) -> io::Result<()> {
    for name in &report.order {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

fn render_graph_pretty(report: &GraphReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Dependency graph ({} nodes, {} edges)",
            report.nodes,
            report.edges.len()
        ),
    )?;

    writeln!(w, "Deployment order:")?;
    for (i, name) in report.order.iter().enumerate() {
        writeln!(w, "{:>4}. {name}", i + 1)?;
    }

    if !report.entry_points.is_empty() {
        writeln!(w)?;
        writeln!(w, "Entry points: {}", report.entry_points.join(", "))?;
    }
    Ok(())
}
