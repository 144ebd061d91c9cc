//! `netsci betweenness`: dependency accumulation from one source, or
//! betweenness centrality summed over all sources.

use std::collections::BTreeMap;
use std::io::Write;

use clap::Args;
use netsci_core::betweenness::{BetweennessAccumulator, DependencyScores};
use netsci_core::bfs::ShortestPathBfs;
use netsci_core::centrality::{betweenness_centrality, normalize};
use serde::Serialize;

use crate::input::{GraphArgs, load, require_node};
use crate::output::{OutputMode, join, or_render, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `netsci betweenness`.
#[derive(Args, Debug)]
pub struct BetweennessArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Source node (default: the fixture's focus, else the first node).
    #[arg(long, short = 's', conflicts_with = "all_sources")]
    pub source: Option<String>,

    /// Sum pair dependencies over every source instead of tracing one.
    #[arg(long)]
    pub all_sources: bool,
}

#[derive(Debug, Serialize)]
struct StepLine {
    node: String,
    leaf: bool,
    successors: Vec<String>,
    score: f64,
    description: String,
}

#[derive(Debug, Serialize)]
struct SingleSourceReport {
    graph: String,
    source: String,
    leaves: Vec<String>,
    steps: Vec<StepLine>,
    scores: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct CentralityRow {
    node: String,
    betweenness: f64,
    normalized: f64,
}

#[derive(Debug, Serialize)]
struct AllSourcesReport {
    graph: String,
    nodes: Vec<CentralityRow>,
}

/// Execute `netsci betweenness`.
pub fn run_betweenness(args: &BetweennessArgs, output: OutputMode) -> anyhow::Result<()> {
    let loaded = load(&args.graph, output)?;

    if args.all_sources {
        let scores = or_render(output, betweenness_centrality(&loaded.graph))?;
        let n = loaded.graph.node_count();
        let report = AllSourcesReport {
            graph: loaded.name,
            nodes: scores
                .into_iter()
                .map(|(node, betweenness)| CentralityRow {
                    node,
                    betweenness,
                    normalized: normalize(betweenness, n),
                })
                .collect(),
        };
        return render_mode(output, &report, render_all_text, render_all_pretty);
    }

    let source = require_node(&loaded, args.source.as_deref(), output)?;
    let bfs = or_render(output, ShortestPathBfs::run(&loaded.graph, &source))?;
    let accumulator = or_render(output, BetweennessAccumulator::new(&bfs))?;
    let report = single_source_report(loaded.name.clone(), accumulator.finish());
    render_mode(output, &report, render_single_text, render_single_pretty)
}

fn single_source_report(graph: String, scores: DependencyScores<String>) -> SingleSourceReport {
    let steps = scores
        .steps
        .iter()
        .map(|step| StepLine {
            node: step.node.clone(),
            leaf: step.leaf,
            successors: step.successors.iter().map(|c| c.successor.clone()).collect(),
            score: step.score,
            description: step.describe(),
        })
        .collect();
    SingleSourceReport {
        graph,
        source: scores.source,
        leaves: scores.leaves,
        steps,
        scores: scores.scores.into_iter().collect(),
    }
}

fn render_single_text(report: &SingleSourceReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "leaves\t{}", join(&report.leaves))?;
    for step in &report.steps {
        writeln!(w, "{}\t{:.6}\t{}", step.node, step.score, join(&step.successors))?;
    }
    Ok(())
}

fn render_single_pretty(report: &SingleSourceReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("Dependency scores from {} in {}", report.source, report.graph),
    )?;
    pretty_kv(w, "leaves", join(&report.leaves))?;
    writeln!(w)?;
    pretty_section(w, "Reverse visit order")?;
    for step in &report.steps {
        writeln!(w, "  {}", step.description)?;
    }
    Ok(())
}

fn render_all_text(report: &AllSourcesReport, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &report.nodes {
        writeln!(w, "{}\t{:.6}\t{:.6}", row.node, row.betweenness, row.normalized)?;
    }
    Ok(())
}

fn render_all_pretty(report: &AllSourcesReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Betweenness centrality in {}", report.graph))?;
    writeln!(w, "{:<10} {:>12} {:>12}", "node", "betweenness", "normalized")?;
    pretty_rule(w)?;
    for row in &report.nodes {
        writeln!(
            w,
            "{:<10} {:>12.4} {:>12.4}",
            row.node, row.betweenness, row.normalized
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsci_core::Fixture;
    use netsci_core::betweenness::dependency_scores;

    #[test]
    fn single_source_report_lists_reverse_order() {
        let graph = Fixture::Betweenness.graph().expect("fixture");
        let bfs = ShortestPathBfs::run(&graph, &"0".to_string()).expect("run");
        let report = single_source_report(
            "betweenness".to_string(),
            dependency_scores(&bfs).expect("complete"),
        );
        let order: Vec<&str> = report.steps.iter().map(|s| s.node.as_str()).collect();
        assert_eq!(order, vec!["4", "3", "2", "1", "0"]);
        assert_eq!(report.leaves, vec!["3".to_string(), "4".to_string()]);

        let mut out = Vec::new();
        render_single_text(&report, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.starts_with("leaves\t3,4\n"));
        assert!(rendered.contains("0\t5.000000\t1,2"));
    }
}
