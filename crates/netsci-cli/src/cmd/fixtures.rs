//! `netsci fixtures`: list the built-in course graphs.

use std::io::Write;

use clap::Args;
use netsci_core::Fixture;
use serde::Serialize;

use crate::output::{OutputMode, or_render, pretty_section, render_mode};

/// Arguments for `netsci fixtures`.
#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// Also print each fixture's edge list.
    #[arg(long)]
    pub edges: bool,
}

#[derive(Debug, Serialize)]
struct FixtureEntry {
    name: &'static str,
    description: &'static str,
    focus: &'static str,
    nodes: Vec<String>,
    edge_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    edges: Vec<[String; 2]>,
}

#[derive(Debug, Serialize)]
struct FixtureList {
    fixtures: Vec<FixtureEntry>,
}

/// Execute `netsci fixtures`.
pub fn run_fixtures(args: &FixturesArgs, output: OutputMode) -> anyhow::Result<()> {
    let mut fixtures = Vec::with_capacity(Fixture::ALL.len());
    for fixture in Fixture::ALL {
        let graph = or_render(output, fixture.graph())?;
        let edges = if args.edges {
            graph
                .edges()
                .into_iter()
                .map(|(u, v)| [u.clone(), v.clone()])
                .collect()
        } else {
            Vec::new()
        };
        fixtures.push(FixtureEntry {
            name: fixture.name(),
            description: fixture.description(),
            focus: fixture.focus(),
            nodes: graph.nodes().to_vec(),
            edge_count: graph.edge_count(),
            edges,
        });
    }
    render_mode(output, &FixtureList { fixtures }, render_fixtures_text, render_fixtures_pretty)
}

fn render_fixtures_text(list: &FixtureList, w: &mut dyn Write) -> std::io::Result<()> {
    for entry in &list.fixtures {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            entry.name,
            entry.nodes.len(),
            entry.edge_count,
            entry.description
        )?;
        for [u, v] in &entry.edges {
            writeln!(w, "\t{u}-{v}")?;
        }
    }
    Ok(())
}

fn render_fixtures_pretty(list: &FixtureList, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Built-in graphs")?;
    for entry in &list.fixtures {
        writeln!(
            w,
            "  {:<18} {:>2} nodes {:>3} edges  focus {:<3} {}",
            entry.name,
            entry.nodes.len(),
            entry.edge_count,
            entry.focus,
            entry.description
        )?;
        if !entry.edges.is_empty() {
            let pairs: Vec<String> = entry.edges.iter().map(|[u, v]| format!("{u}-{v}")).collect();
            writeln!(w, "  {:<18} {}", "", pairs.join(" "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_is_listed() {
        let fixtures: Vec<FixtureEntry> = Fixture::ALL
            .iter()
            .map(|fixture| {
                let graph = fixture.graph().expect("fixture");
                FixtureEntry {
                    name: fixture.name(),
                    description: fixture.description(),
                    focus: fixture.focus(),
                    nodes: graph.nodes().to_vec(),
                    edge_count: graph.edge_count(),
                    edges: Vec::new(),
                }
            })
            .collect();
        let mut out = Vec::new();
        render_fixtures_text(&FixtureList { fixtures }, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert_eq!(rendered.lines().count(), Fixture::ALL.len());
        assert!(rendered.contains("shortest-paths\t7\t"));
        assert!(rendered.contains("clustering-demo\t10\t16\t"));
    }
}
