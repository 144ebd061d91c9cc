//! Built-in course graphs.
//!
//! Each fixture reproduces the graph of one course exercise, with adjacency
//! order preserved where the exercise's trace depends on it.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::GraphError;
use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fixture {
    ShortestPaths,
    Betweenness,
    ClusteringLocal,
    ClusteringDemo,
    WalkPath,
    MatrixPowers,
}

impl Fixture {
    pub const ALL: [Self; 6] = [
        Self::ShortestPaths,
        Self::Betweenness,
        Self::ClusteringLocal,
        Self::ClusteringDemo,
        Self::WalkPath,
        Self::MatrixPowers,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShortestPaths => "shortest-paths",
            Self::Betweenness => "betweenness",
            Self::ClusteringLocal => "clustering-local",
            Self::ClusteringDemo => "clustering-demo",
            Self::WalkPath => "walk-path",
            Self::MatrixPowers => "matrix-powers",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ShortestPaths => "7 nodes; three shortest paths from 0 to 5",
            Self::Betweenness => "5-node cycle plus chord; leaves 3 and 4 from source 0",
            Self::ClusteringLocal => "bowtie around node 2; local coefficient 1/3",
            Self::ClusteringDemo => "10 nodes with a hub (9) for global clustering",
            Self::WalkPath => "nodes A-E; A,B,D,E,B,C is a walk, A,B,D,E,C a path",
            Self::MatrixPowers => "5 nodes for counting walks with A^k",
        }
    }

    /// Node the exercise starts from (BFS source or clustering target).
    #[must_use]
    pub const fn focus(self) -> &'static str {
        match self {
            Self::ClusteringLocal => "2",
            Self::ClusteringDemo => "9",
            Self::WalkPath => "A",
            Self::ShortestPaths | Self::Betweenness | Self::MatrixPowers => "0",
        }
    }

    /// Build the fixture graph with string ids.
    ///
    /// # Errors
    ///
    /// Never for the built-in data; the `Result` surfaces graph-construction
    /// checks rather than hiding them.
    pub fn graph(self) -> Result<Graph<String>, GraphError> {
        match self {
            Self::ShortestPaths => adjacency(&[
                ("0", &["1", "2"]),
                ("1", &["0", "2", "3", "4"]),
                ("2", &["0", "1", "4"]),
                ("3", &["1", "5"]),
                ("4", &["1", "2", "5", "6"]),
                ("5", &["3", "4", "6"]),
                ("6", &["4", "5"]),
            ]),
            Self::Betweenness => adjacency(&[
                ("0", &["1", "2"]),
                ("1", &["0", "2", "3"]),
                ("2", &["0", "1", "4"]),
                ("3", &["1", "4"]),
                ("4", &["2", "3"]),
            ]),
            Self::ClusteringLocal => adjacency(&[
                ("0", &["1", "2"]),
                ("1", &["0", "2"]),
                ("2", &["0", "1", "3", "4"]),
                ("3", &["2", "4"]),
                ("4", &["2", "3"]),
            ]),
            Self::ClusteringDemo => edges(
                &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"],
                &[
                    ("0", "1"),
                    ("1", "2"),
                    ("2", "3"),
                    ("3", "4"),
                    ("4", "5"),
                    ("5", "6"),
                    ("6", "7"),
                    ("7", "0"),
                    ("0", "9"),
                    ("1", "9"),
                    ("2", "9"),
                    ("4", "9"),
                    ("5", "9"),
                    ("8", "5"),
                    ("8", "6"),
                    ("8", "9"),
                ],
            ),
            Self::WalkPath => edges(
                &["A", "B", "C", "D", "E"],
                &[
                    ("A", "B"),
                    ("B", "C"),
                    ("B", "D"),
                    ("D", "E"),
                    ("E", "B"),
                    ("C", "E"),
                ],
            ),
            Self::MatrixPowers => edges(
                &["0", "1", "2", "3", "4"],
                &[
                    ("0", "1"),
                    ("0", "3"),
                    ("1", "2"),
                    ("3", "2"),
                    ("3", "4"),
                    ("4", "0"),
                ],
            ),
        }
    }
}

fn adjacency(lists: &[(&str, &[&str])]) -> Result<Graph<String>, GraphError> {
    Graph::from_adjacency(lists.iter().map(|&(node, neighbors)| {
        (
            node.to_string(),
            neighbors.iter().map(|&n| n.to_string()),
        )
    }))
}

fn edges(nodes: &[&str], pairs: &[(&str, &str)]) -> Result<Graph<String>, GraphError> {
    Graph::new(
        nodes.iter().map(|&n| n.to_string()),
        pairs.iter().map(|&(u, v)| (u.to_string(), v.to_string())),
    )
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fixture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|fixture| fixture.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                format!("unknown fixture '{s}' (known: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_builds() {
        for fixture in Fixture::ALL {
            let graph = fixture.graph().expect("fixture graph");
            assert!(
                graph.contains(&fixture.focus().to_string()),
                "{fixture} lacks focus node"
            );
        }
    }

    #[test]
    fn names_round_trip() {
        for fixture in Fixture::ALL {
            assert_eq!(fixture.name().parse::<Fixture>(), Ok(fixture));
        }
        assert_eq!("walk_path".parse::<Fixture>(), Ok(Fixture::WalkPath));
        assert!("petersen".parse::<Fixture>().is_err());
    }

    #[test]
    fn sizes_match_exercises() {
        let sizes: Vec<(usize, usize)> = Fixture::ALL
            .iter()
            .map(|f| {
                let g = f.graph().expect("graph");
                (g.node_count(), g.edge_count())
            })
            .collect();
        assert_eq!(sizes, vec![(7, 10), (5, 6), (5, 6), (10, 16), (5, 6), (5, 6)]);
    }
}
