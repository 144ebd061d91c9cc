//! `netsci power`: adjacency matrix powers and the walks they count.

use std::io::Write;

use clap::Args;
use netsci_core::config::ProjectConfig;
use netsci_core::matrix::{AdjacencyMatrix, MatrixPower, enumerate_walks};
use serde::Serialize;
use tracing::debug;

use crate::input::{GraphArgs, load};
use crate::output::{
    CliError, OutputMode, or_render, pretty_kv, pretty_rule, pretty_section, render_error,
    render_mode,
};

/// Arguments for `netsci power`.
#[derive(Args, Debug)]
pub struct PowerArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Exponent `k` of `A^k`.
    #[arg(long, short = 'k', default_value_t = 2)]
    pub power: u32,

    /// Start node for walk enumeration (requires `--to`).
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// End node for walk enumeration (requires `--from`).
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
struct WalkListing {
    from: String,
    to: String,
    count: u64,
    walks: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct PowerReport {
    graph: String,
    matrix: MatrixPower<String>,
    total_walks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    walks: Option<WalkListing>,
}

/// Execute `netsci power`.
pub fn run_power(args: &PowerArgs, output: OutputMode, config: &ProjectConfig) -> anyhow::Result<()> {
    if args.power > config.walks.max_power {
        render_error(
            output,
            &CliError::with_details(
                format!(
                    "power {} exceeds the configured maximum of {}",
                    args.power, config.walks.max_power
                ),
                "raise [walks] max_power in netsci.toml or pick a smaller --power",
                "power_too_large",
            ),
        )?;
        anyhow::bail!("power {} exceeds max_power", args.power);
    }

    let loaded = load(&args.graph, output)?;
    let adjacency = AdjacencyMatrix::from_graph(&loaded.graph);
    let matrix = or_render(output, adjacency.power(args.power))?;

    let walks = match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            let count = or_render(output, adjacency.walk_count(from, to, args.power))?;
            let walks = or_render(output, enumerate_walks(&loaded.graph, from, to, args.power))?;
            debug!(count, listed = walks.len(), "walks enumerated");
            Some(WalkListing {
                from: from.clone(),
                to: to.clone(),
                count,
                walks,
            })
        }
        _ => None,
    };

    let report = PowerReport {
        graph: loaded.name,
        total_walks: matrix.total_walks(),
        matrix,
        walks,
    };
    render_mode(output, &report, render_power_text, render_power_pretty)
}

fn render_power_text(report: &PowerReport, w: &mut dyn Write) -> std::io::Result<()> {
    for (node, row) in report.matrix.nodes.iter().zip(&report.matrix.rows) {
        let cells: Vec<String> = row.iter().map(u64::to_string).collect();
        writeln!(w, "{node}\t{}", cells.join("\t"))?;
    }
    if let Some(listing) = &report.walks {
        writeln!(w, "count\t{}", listing.count)?;
        for walk in &listing.walks {
            writeln!(w, "{}", walk.join("-"))?;
        }
    }
    Ok(())
}

fn render_power_pretty(report: &PowerReport, w: &mut dyn Write) -> std::io::Result<()> {
    let matrix = &report.matrix;
    pretty_section(w, &format!("A^{} for {}", matrix.power, report.graph))?;
    write!(w, "{:>6}", "")?;
    for node in &matrix.nodes {
        write!(w, "{node:>6}")?;
    }
    writeln!(w)?;
    pretty_rule(w)?;
    for (node, row) in matrix.nodes.iter().zip(&matrix.rows) {
        write!(w, "{node:>6}")?;
        for cell in row {
            write!(w, "{cell:>6}")?;
        }
        writeln!(w)?;
    }
    writeln!(w)?;
    pretty_kv(w, "total walks", report.total_walks.to_string())?;

    if let Some(listing) = &report.walks {
        pretty_kv(
            w,
            &format!("{} → {}", listing.from, listing.to),
            format!("{} walks of length {}", listing.count, matrix.power),
        )?;
        for walk in &listing.walks {
            writeln!(w, "{:<14}   {}", "", walk.join(" → "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsci_core::Fixture;

    fn report(k: u32) -> PowerReport {
        let graph = Fixture::MatrixPowers.graph().expect("fixture");
        let adjacency = AdjacencyMatrix::from_graph(&graph);
        let matrix = adjacency.power(k).expect("no overflow");
        let walks = enumerate_walks(&graph, &"0".to_string(), &"2".to_string(), k).expect("walks");
        PowerReport {
            graph: "matrix-powers".to_string(),
            total_walks: matrix.total_walks(),
            matrix,
            walks: Some(WalkListing {
                from: "0".to_string(),
                to: "2".to_string(),
                count: adjacency
                    .walk_count(&"0".to_string(), &"2".to_string(), k)
                    .expect("count"),
                walks,
            }),
        }
    }

    #[test]
    fn square_counts_two_walks_between_opposite_corners() {
        let report = report(2);
        let listing = report.walks.as_ref().expect("listing");
        assert_eq!(listing.count, 2);
        assert_eq!(listing.walks.len(), 2);

        let mut out = Vec::new();
        render_power_text(&report, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("count\t2\n"));
        assert!(rendered.contains("0-1-2\n"));
        assert!(rendered.contains("0-3-2\n"));
    }

    #[test]
    fn zeroth_power_is_identity() {
        let report = report(0);
        for (i, row) in report.matrix.rows.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                assert_eq!(cell, u64::from(i == j));
            }
        }
        assert_eq!(report.walks.as_ref().map(|l| l.count), Some(0));
    }
}
