//! Graph selection shared by every algorithm command.

use std::path::PathBuf;

use clap::Args;
use netsci_core::error::{ErrorCode, GraphError};
use netsci_core::{Fixture, Graph, GraphFile};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// `--file` or `--fixture`, exactly one.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct GraphArgs {
    /// Graph file (TOML, or JSON by extension).
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Built-in course graph (see `netsci fixtures`).
    #[arg(long, short = 'x')]
    pub fixture: Option<Fixture>,
}

/// A graph ready for the algorithms, plus the node the exercise focuses on.
#[derive(Debug)]
pub struct LoadedGraph {
    pub name: String,
    pub graph: Graph<String>,
    pub focus: Option<String>,
}

impl LoadedGraph {
    /// `explicit` if given, else the fixture focus, else the first node.
    pub fn pick_node(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.focus.clone())
            .or_else(|| self.graph.nodes().first().cloned())
    }
}

/// Load the selected graph, rendering any failure before returning it.
pub fn load(args: &GraphArgs, output: OutputMode) -> anyhow::Result<LoadedGraph> {
    let loaded = match (&args.fixture, &args.file) {
        (Some(fixture), _) => fixture
            .graph()
            .map(|graph| LoadedGraph {
                name: fixture.name().to_string(),
                graph,
                focus: Some(fixture.focus().to_string()),
            })
            .map_err(anyhow::Error::from),
        (None, Some(path)) => GraphFile::load(path).and_then(|file| {
            let name = file
                .name
                .clone()
                .unwrap_or_else(|| path.display().to_string());
            file.into_graph().map(|graph| LoadedGraph {
                name,
                graph,
                focus: None,
            })
        }),
        (None, None) => Err(anyhow::anyhow!("provide --file or --fixture")),
    };

    match loaded {
        Ok(loaded) => {
            debug!(
                graph = %loaded.name,
                nodes = loaded.graph.node_count(),
                edges = loaded.graph.edge_count(),
                hash = %loaded.graph.content_hash(),
                "graph loaded"
            );
            Ok(loaded)
        }
        Err(err) => {
            let cli_error = err.downcast_ref::<GraphError>().map_or_else(
                || CliError::from_code(ErrorCode::GraphFileInvalid, format!("{err:#}")),
                CliError::from,
            );
            render_error(output, &cli_error)?;
            Err(err)
        }
    }
}

/// Require a node: the explicit one, the fixture focus or the first node.
pub fn require_node(
    loaded: &LoadedGraph,
    explicit: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<String> {
    if let Some(node) = loaded.pick_node(explicit) {
        return Ok(node);
    }
    render_error(
        output,
        &CliError::with_details(
            "graph has no nodes",
            "add at least one node to the graph file",
            ErrorCode::GraphFileInvalid.code(),
        ),
    )?;
    anyhow::bail!("graph has no nodes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_focus_is_default_node() {
        let args = GraphArgs {
            file: None,
            fixture: Some(Fixture::ClusteringLocal),
        };
        let loaded = load(&args, OutputMode::Text).expect("fixture");
        assert_eq!(loaded.pick_node(None).as_deref(), Some("2"));
        assert_eq!(loaded.pick_node(Some("4")).as_deref(), Some("4"));
    }

    #[test]
    fn file_without_name_uses_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("g.toml");
        std::fs::write(&path, "edges = [[\"a\", \"b\"]]").expect("write");
        let args = GraphArgs {
            file: Some(path.clone()),
            fixture: None,
        };
        let loaded = load(&args, OutputMode::Text).expect("file");
        assert_eq!(loaded.name, path.display().to_string());
        assert_eq!(loaded.pick_node(None).as_deref(), Some("a"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = GraphArgs {
            file: Some(PathBuf::from("/definitely/not/here.toml")),
            fixture: None,
        };
        assert!(load(&args, OutputMode::Text).is_err());
    }
}
