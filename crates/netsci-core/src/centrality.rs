//! All-pairs betweenness centrality built from single-source passes.
//!
//! For every source `s` this runs a traversal plus dependency accumulation
//! and adds `x[v] - 1` (the pair dependency of `s` on `v`) to every reached
//! `v ≠ s`. Each unordered pair is seen from both ends, so the total is
//! halved. Scores are not normalized; divide by `(n-1)(n-2)/2` for the
//! fraction of pairs.
//!
//! Complexity: O(V · E).

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::betweenness::dependency_scores;
use crate::bfs::ShortestPathBfs;
use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// Betweenness centrality of every node.
///
/// Isolated nodes and nodes on no shortest path score `0.0`.
///
/// # Errors
///
/// [`GraphError::MultiplicityOverflow`] if a shortest-path count exceeds
/// `u64` for some source.
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn betweenness_centrality<N: NodeId>(graph: &Graph<N>) -> Result<BTreeMap<N, f64>, GraphError> {
    let mut totals: BTreeMap<N, f64> = graph.nodes().iter().map(|n| (n.clone(), 0.0)).collect();

    for source in graph.nodes() {
        let bfs = ShortestPathBfs::run(graph, source)?;
        let scores = dependency_scores(&bfs)?;
        for (node, x) in scores.scores {
            if &node == source {
                continue;
            }
            if let Some(total) = totals.get_mut(&node) {
                *total += x - 1.0;
            }
        }
    }

    for total in totals.values_mut() {
        *total /= 2.0;
    }

    debug!("betweenness centrality computed");
    Ok(totals)
}

/// `score / ((n-1)(n-2)/2)`, the fraction of other pairs a node lies
/// between. Zero for graphs with fewer than three nodes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalize(score: f64, node_count: usize) -> f64 {
    if node_count < 3 {
        return 0.0;
    }
    let n = node_count as f64;
    score / ((n - 1.0) * (n - 2.0) / 2.0)
}
