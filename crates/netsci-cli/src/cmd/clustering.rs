//! `netsci clustering`: local coefficient with its pair trace, or the
//! global coefficient.

use std::io::Write;

use clap::Args;
use netsci_core::clustering::{
    GlobalClustering, LocalClustering, coefficient_or_zero, global_clustering, local_clustering,
};
use serde::Serialize;

use crate::input::{GraphArgs, load, require_node};
use crate::output::{OutputMode, join, or_render, pretty_kv, pretty_section, render_mode};

/// Arguments for `netsci clustering`.
#[derive(Args, Debug)]
pub struct ClusteringArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Node to examine (default: the fixture's focus, else the first node).
    #[arg(long, short = 'n', conflicts_with = "global")]
    pub node: Option<String>,

    /// Global coefficient plus every node's local coefficient.
    #[arg(long)]
    pub global: bool,
}

#[derive(Debug, Serialize)]
struct NodeCoefficient {
    node: String,
    degree: usize,
    coefficient: f64,
}

#[derive(Debug, Serialize)]
struct GlobalReport {
    graph: String,
    #[serde(flatten)]
    global: GlobalClustering,
    nodes: Vec<NodeCoefficient>,
}

#[derive(Debug, Serialize)]
struct LocalReport {
    graph: String,
    #[serde(flatten)]
    local: LocalClustering<String>,
}

/// Execute `netsci clustering`.
pub fn run_clustering(args: &ClusteringArgs, output: OutputMode) -> anyhow::Result<()> {
    let loaded = load(&args.graph, output)?;

    if args.global {
        let mut nodes = Vec::with_capacity(loaded.graph.node_count());
        for node in loaded.graph.nodes() {
            nodes.push(NodeCoefficient {
                node: node.clone(),
                degree: or_render(output, loaded.graph.degree(node))?,
                coefficient: or_render(output, coefficient_or_zero(&loaded.graph, node))?,
            });
        }
        let report = GlobalReport {
            global: global_clustering(&loaded.graph),
            graph: loaded.name,
            nodes,
        };
        return render_mode(output, &report, render_global_text, render_global_pretty);
    }

    let node = require_node(&loaded, args.node.as_deref(), output)?;
    let local = or_render(output, local_clustering(&loaded.graph, &node))?;
    let report = LocalReport {
        graph: loaded.name,
        local,
    };
    render_mode(output, &report, render_local_text, render_local_pretty)
}

fn render_local_text(report: &LocalReport, w: &mut dyn Write) -> std::io::Result<()> {
    let local = &report.local;
    for check in &local.checks {
        writeln!(
            w,
            "{}-{}\t{}\t{}",
            check.u,
            check.v,
            if check.connected { "edge" } else { "none" },
            check.connected_so_far
        )?;
    }
    writeln!(
        w,
        "{}\t{}/{}\t{:.6}",
        local.node,
        local.connected_pairs.len(),
        local.possible_pairs,
        local.coefficient
    )
}

fn render_local_pretty(report: &LocalReport, w: &mut dyn Write) -> std::io::Result<()> {
    let local = &report.local;
    pretty_section(
        w,
        &format!("Local clustering of {} in {}", local.node, report.graph),
    )?;
    pretty_kv(w, "neighbors", join(&local.neighbors))?;
    pretty_kv(w, "degree", local.degree.to_string())?;
    writeln!(w)?;
    for check in &local.checks {
        writeln!(
            w,
            "  {}-{}  {}  (connected so far: {})",
            check.u,
            check.v,
            if check.connected { "✓" } else { "·" },
            check.connected_so_far
        )?;
    }
    writeln!(w)?;
    pretty_kv(
        w,
        "coefficient",
        format!(
            "2·{} / ({}·{}) = {:.4}",
            local.connected_pairs.len(),
            local.degree,
            local.degree - 1,
            local.coefficient
        ),
    )
}

fn render_global_text(report: &GlobalReport, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &report.nodes {
        writeln!(w, "{}\t{}\t{:.6}", row.node, row.degree, row.coefficient)?;
    }
    writeln!(
        w,
        "global\t{}/{}\t{:.6}",
        report.global.closed_paths, report.global.paths_of_length_two, report.global.coefficient
    )
}

fn render_global_pretty(report: &GlobalReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Clustering in {}", report.graph))?;
    pretty_kv(
        w,
        "global",
        format!(
            "{} closed / {} paths of length 2 = {:.4}",
            report.global.closed_paths, report.global.paths_of_length_two, report.global.coefficient
        ),
    )?;
    writeln!(w)?;
    writeln!(w, "{:<10} {:>6} {:>12}", "node", "degree", "local")?;
    for row in &report.nodes {
        writeln!(w, "{:<10} {:>6} {:>12.4}", row.node, row.degree, row.coefficient)?;
    }
    Ok(())
}
