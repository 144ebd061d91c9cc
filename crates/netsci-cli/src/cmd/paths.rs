//! `netsci paths`: enumerate all shortest paths from a source.

use std::io::Write;

use clap::Args;
use netsci_core::bfs::ShortestPathBfs;
use netsci_core::paths::{PathReconstructor, ShortestPaths};
use serde::Serialize;

use crate::input::{GraphArgs, load, require_node};
use crate::output::{OutputMode, or_render, pretty_kv, pretty_section, render_mode};

/// Arguments for `netsci paths`.
#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Source node (default: the fixture's focus, else the first node).
    #[arg(long, short = 's')]
    pub source: Option<String>,

    /// Only this target; otherwise every reachable node in visit order.
    #[arg(long, short = 't')]
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
struct PathsReport {
    graph: String,
    source: String,
    targets: Vec<ShortestPaths<String>>,
}

/// Execute `netsci paths`.
pub fn run_paths(args: &PathsArgs, output: OutputMode) -> anyhow::Result<()> {
    let loaded = load(&args.graph, output)?;
    let source = require_node(&loaded, args.source.as_deref(), output)?;

    let bfs = or_render(output, ShortestPathBfs::run(&loaded.graph, &source))?;
    let reconstructor = or_render(output, PathReconstructor::new(&bfs))?;

    let targets = match &args.target {
        Some(target) => vec![or_render(output, reconstructor.all_shortest_paths(target))?],
        None => reconstructor.all_shortest_paths_from_source(),
    };

    let report = PathsReport {
        graph: loaded.name,
        source,
        targets,
    };
    render_mode(output, &report, render_paths_text, render_paths_pretty)
}

fn render_paths_text(report: &PathsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for entry in &report.targets {
        if entry.paths.is_empty() {
            writeln!(w, "{}\tunreachable", entry.target)?;
        }
        for path in &entry.paths {
            writeln!(w, "{}\t{}", entry.target, path.join("-"))?;
        }
    }
    Ok(())
}

fn render_paths_pretty(report: &PathsReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("All shortest paths from {} in {}", report.source, report.graph),
    )?;
    for entry in &report.targets {
        let heading = match entry.distance {
            Some(d) => format!("{} paths, length {d}", entry.count()),
            None => "unreachable".to_string(),
        };
        pretty_kv(w, &format!("to {}", entry.target), heading)?;
        for path in &entry.paths {
            writeln!(w, "{:<14}   {}", "", path.join(" → "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsci_core::Fixture;

    fn report(target: Option<&str>) -> PathsReport {
        let graph = Fixture::ShortestPaths.graph().expect("fixture");
        let bfs = ShortestPathBfs::run(&graph, &"0".to_string()).expect("run");
        let reconstructor = PathReconstructor::new(&bfs).expect("complete");
        let targets = match target {
            Some(t) => vec![reconstructor.all_shortest_paths(&t.to_string()).expect("target")],
            None => reconstructor.all_shortest_paths_from_source(),
        };
        PathsReport {
            graph: "shortest-paths".to_string(),
            source: "0".to_string(),
            targets,
        }
    }

    #[test]
    fn text_lists_each_path() {
        let mut out = Vec::new();
        render_paths_text(&report(Some("5")), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert_eq!(rendered, "5\t0-1-3-5\n5\t0-1-4-5\n5\t0-2-4-5\n");
    }

    #[test]
    fn pretty_covers_every_target() {
        let mut out = Vec::new();
        render_paths_pretty(&report(None), &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        for node in 0..7 {
            assert!(rendered.contains(&format!("to {node}:")), "missing {node}");
        }
        assert!(rendered.contains("3 paths, length 3"));
    }
}
