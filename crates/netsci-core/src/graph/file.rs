//! Graph input files.
//!
//! A graph file is TOML or JSON (chosen by extension, TOML otherwise) and
//! takes one of two shapes:
//!
//! ```toml
//! name = "cycle-plus-chord"
//! nodes = [0, 1, 2, 3, 4]            # optional; otherwise first mention
//! edges = [[0, 1], [0, 2], [1, 2], [1, 3], [2, 4], [3, 4]]
//! ```
//!
//! ```toml
//! [[adjacency]]
//! node = 0
//! neighbors = [1, 2]
//! ```
//!
//! Ids may be written as strings or integers; both become `String` ids.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::model::Graph;

/// A node id as written in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeLabel {
    Int(i64),
    Text(String),
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<NodeLabel> for String {
    fn from(label: NodeLabel) -> Self {
        match label {
            NodeLabel::Int(n) => n.to_string(),
            NodeLabel::Text(s) => s,
        }
    }
}

/// One ordered adjacency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub node: NodeLabel,
    #[serde(default)]
    pub neighbors: Vec<NodeLabel>,
}

/// On-disk graph description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeLabel>,
    #[serde(default)]
    pub edges: Vec<[NodeLabel; 2]>,
    #[serde(default)]
    pub adjacency: Vec<AdjacencyEntry>,
}

impl GraphFile {
    /// Read and parse a graph file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::parse_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Self::parse_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
        }
    }

    /// # Errors
    ///
    /// Returns an error on malformed TOML.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    ///
    /// Returns an error on malformed JSON.
    pub fn parse_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the described graph.
    ///
    /// # Errors
    ///
    /// Returns an error if both shapes are mixed, if the file describes no
    /// nodes at all, or if graph construction rejects a node or edge.
    pub fn into_graph(self) -> Result<Graph<String>> {
        let graph = if self.adjacency.is_empty() {
            let edges = self
                .edges
                .into_iter()
                .map(|[u, v]| (String::from(u), String::from(v)));
            if self.nodes.is_empty() {
                Graph::from_edges(edges)?
            } else {
                Graph::new(self.nodes.into_iter().map(String::from), edges)?
            }
        } else {
            if !self.nodes.is_empty() || !self.edges.is_empty() {
                bail!("use either `nodes` + `edges` or `adjacency`, not both");
            }
            Graph::from_adjacency(self.adjacency.into_iter().map(|entry| {
                (
                    String::from(entry.node),
                    entry.neighbors.into_iter().map(String::from),
                )
            }))?
        };

        if graph.is_empty() {
            bail!("graph file describes no nodes");
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn toml_edges_with_integer_ids() {
        let file = GraphFile::parse_toml(
            r#"
name = "triangle"
edges = [[0, 1], [1, 2], [2, 0]]
"#,
        )
        .expect("parse");
        assert_eq!(file.name.as_deref(), Some("triangle"));
        let graph = file.into_graph().expect("graph");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge(&"2".to_string(), &"0".to_string()).expect("nodes"));
    }

    #[test]
    fn toml_adjacency_keeps_order() {
        let file = GraphFile::parse_toml(
            r#"
[[adjacency]]
node = "a"
neighbors = ["c", "b"]

[[adjacency]]
node = "b"
neighbors = ["a"]

[[adjacency]]
node = "c"
neighbors = ["a"]
"#,
        )
        .expect("parse");
        let graph = file.into_graph().expect("graph");
        let a = "a".to_string();
        assert_eq!(
            graph.neighbors(&a).expect("a"),
            vec![&"c".to_string(), &"b".to_string()]
        );
    }

    #[test]
    fn json_with_isolated_node() {
        let file = GraphFile::parse_json(r#"{"nodes": ["x", "y", "z"], "edges": [["x", "y"]]}"#)
            .expect("parse");
        let graph = file.into_graph().expect("graph");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.degree(&"z".to_string()).expect("z"), 0);
    }

    #[test]
    fn mixed_shapes_rejected() {
        let file = GraphFile::parse_toml(
            r#"
edges = [[0, 1]]

[[adjacency]]
node = 0
neighbors = []
"#,
        )
        .expect("parse");
        assert!(file.into_graph().is_err());
    }

    #[test]
    fn self_loop_surfaces_graph_error() {
        let file = GraphFile::parse_toml("edges = [[1, 1]]").expect("parse");
        let err = file.into_graph().expect_err("self-loop");
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::InvalidEdge { .. })
        ));
    }

    #[test]
    fn load_picks_parser_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("g.json");
        std::fs::write(&path, r#"{"edges": [[1, 2]]}"#).expect("write");
        let graph = GraphFile::load(&path).expect("load").into_graph().expect("graph");
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn integer_and_string_spellings_of_one_id_collide() {
        let file = GraphFile::parse_toml(r#"nodes = [1, "1"]"#).expect("parse");
        let err = file.into_graph().expect_err("duplicate id");
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::DuplicateNode { node }) if node == "1"
        ));
    }
}
