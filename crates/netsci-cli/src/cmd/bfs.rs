//! `netsci bfs`: step through a single-source shortest-path traversal.

use std::io::Write;

use clap::Args;
use netsci_core::bfs::{BfsSnapshot, Granularity, ShortestPathBfs, StepEvent};
use netsci_core::config::ProjectConfig;
use serde::Serialize;

use crate::input::{GraphArgs, load, require_node};
use crate::output::{OutputMode, join, or_render, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `netsci bfs`.
#[derive(Args, Debug)]
pub struct BfsArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Source node (default: the fixture's focus, else the first node).
    #[arg(long, short = 's')]
    pub source: Option<String>,

    /// Step size: `node` (dequeue and drain) or `neighbor` (one edge).
    /// Defaults to `[bfs] granularity` in netsci.toml.
    #[arg(long, short = 'g')]
    pub granularity: Option<Granularity>,

    /// Skip the per-step trace and print the final state only.
    #[arg(long)]
    pub final_only: bool,
}

#[derive(Debug, Serialize)]
struct TraceStep {
    step: usize,
    read: usize,
    write: usize,
    description: String,
    event: StepEvent<String>,
}

#[derive(Debug, Serialize)]
struct BfsReport {
    graph: String,
    granularity: Granularity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<TraceStep>,
    #[serde(rename = "final")]
    final_state: BfsSnapshot<String>,
}

/// Execute `netsci bfs`.
pub fn run_bfs(args: &BfsArgs, output: OutputMode, config: &ProjectConfig) -> anyhow::Result<()> {
    let loaded = load(&args.graph, output)?;
    let source = require_node(&loaded, args.source.as_deref(), output)?;
    let granularity = args.granularity.unwrap_or(config.bfs.granularity);

    let mut bfs = or_render(output, ShortestPathBfs::new(&loaded.graph, &source))?;
    let mut trace = Vec::new();
    loop {
        let event = or_render(output, bfs.step(granularity))?;
        let done = event.is_complete();
        if !args.final_only {
            trace.push(TraceStep {
                step: bfs.steps_taken(),
                read: bfs.read_cursor(),
                write: bfs.write_cursor(),
                description: event.describe(),
                event,
            });
        }
        if done {
            break;
        }
    }

    let report = BfsReport {
        graph: loaded.name,
        granularity,
        trace,
        final_state: bfs.snapshot(),
    };
    render_mode(output, &report, render_bfs_text, render_bfs_pretty)
}

fn distance_label(distance: Option<u32>) -> String {
    distance.map_or_else(|| "-".to_string(), |d| d.to_string())
}

fn render_bfs_text(report: &BfsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for step in &report.trace {
        writeln!(w, "{}\t{}/{}\t{}", step.step, step.read, step.write, step.description)?;
    }
    writeln!(w, "node\tdistance\tmultiplicity\tpredecessors")?;
    for state in &report.final_state.nodes {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            state.node,
            distance_label(state.distance),
            state.multiplicity,
            join(&state.predecessors)
        )?;
    }
    Ok(())
}

fn render_bfs_pretty(report: &BfsReport, w: &mut dyn Write) -> std::io::Result<()> {
    let snapshot = &report.final_state;
    pretty_section(w, &format!("Shortest paths from {} in {}", snapshot.source, report.graph))?;
    pretty_kv(w, "granularity", report.granularity.to_string())?;
    pretty_kv(w, "steps", snapshot.steps.to_string())?;
    pretty_kv(w, "visit order", join(&snapshot.visit_order))?;

    if !report.trace.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Trace")?;
        for step in &report.trace {
            writeln!(
                w,
                "{:>4}  [r={} w={}]  {}",
                step.step, step.read, step.write, step.description
            )?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Final state")?;
    writeln!(w, "{:<8} {:>8} {:>12}  predecessors", "node", "distance", "multiplicity")?;
    pretty_rule(w)?;
    for state in &snapshot.nodes {
        writeln!(
            w,
            "{:<8} {:>8} {:>12}  {}",
            state.node,
            distance_label(state.distance),
            state.multiplicity,
            if state.predecessors.is_empty() {
                "-".to_string()
            } else {
                join(&state.predecessors)
            }
        )?;
    }
    Ok(())
}
