//! `netsci walk`: check a node sequence and classify it as a path or a walk.

use std::io::Write;

use clap::Args;
use netsci_core::walks::{WalkReport, classify_walk};
use serde::Serialize;

use crate::input::{GraphArgs, load};
use crate::output::{OutputMode, join, or_render, pretty_kv, pretty_section, render_mode};

/// Arguments for `netsci walk`.
#[derive(Args, Debug)]
pub struct WalkArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Node sequence, space or comma separated (e.g. `A,B,C,E,B,D`).
    #[arg(required = true, value_delimiter = ',', num_args = 1..)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct WalkOutput {
    graph: String,
    #[serde(flatten)]
    report: WalkReport<String>,
}

/// Execute `netsci walk`.
pub fn run_walk(args: &WalkArgs, output: OutputMode) -> anyhow::Result<()> {
    let loaded = load(&args.graph, output)?;
    let report = or_render(output, classify_walk(&loaded.graph, &args.nodes))?;
    let out = WalkOutput {
        graph: loaded.name,
        report,
    };
    render_mode(output, &out, render_walk_text, render_walk_pretty)
}

fn render_walk_text(out: &WalkOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &out.report;
    writeln!(
        w,
        "{}\t{}\t{}",
        report.kind,
        report.length,
        report.sequence.join("-")
    )?;
    if !report.repeated.is_empty() {
        writeln!(w, "repeated\t{}", join(&report.repeated))?;
    }
    Ok(())
}

fn render_walk_pretty(out: &WalkOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &out.report;
    pretty_section(w, &format!("Walk in {}", out.graph))?;
    pretty_kv(w, "sequence", report.sequence.join(" → "))?;
    pretty_kv(w, "length", report.length.to_string())?;
    pretty_kv(w, "kind", report.kind.to_string())?;
    if !report.repeated.is_empty() {
        let counts: Vec<String> = report
            .repeated
            .iter()
            .map(|node| format!("{node}×{}", report.visits.get(node).copied().unwrap_or(0)))
            .collect();
        pretty_kv(w, "repeated", counts.join(", "))?;
    }
    Ok(())
}
