//! Walks versus paths.
//!
//! A **walk** is a node sequence in which every consecutive pair is joined
//! by an edge. A **path** is a walk that never repeats a node. The length of
//! either is its number of edges.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::instrument;

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkKind {
    /// No repeated nodes.
    Path,
    /// Adjacent steps but at least one node repeats.
    Walk,
}

impl std::fmt::Display for WalkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path => f.write_str("path"),
            Self::Walk => f.write_str("walk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkReport<N> {
    pub kind: WalkKind,
    pub sequence: Vec<N>,
    /// Number of edges traversed.
    pub length: usize,
    /// Traversed edges, in order.
    pub steps: Vec<(N, N)>,
    /// How many times each node occurs in the sequence.
    pub visits: BTreeMap<N, usize>,
    /// Nodes occurring more than once, in identifier order.
    pub repeated: Vec<N>,
}

impl<N> WalkReport<N> {
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.kind == WalkKind::Path
    }
}

/// Check that `sequence` is a walk in `graph` and classify it.
///
/// # Errors
///
/// [`GraphError::InvalidWalk`] for an empty sequence or a non-adjacent
/// consecutive pair, [`GraphError::UnknownNode`] for an id not in the graph.
#[instrument(skip(graph, sequence), fields(len = sequence.len()))]
pub fn classify_walk<N: NodeId>(
    graph: &Graph<N>,
    sequence: &[N],
) -> Result<WalkReport<N>, GraphError> {
    let Some(first) = sequence.first() else {
        return Err(GraphError::InvalidWalk {
            reason: "empty sequence".to_string(),
        });
    };
    graph.index_of(first)?;

    let mut steps = Vec::with_capacity(sequence.len().saturating_sub(1));
    for pair in sequence.windows(2) {
        let (u, v) = (&pair[0], &pair[1]);
        if !graph.has_edge(u, v)? {
            return Err(GraphError::InvalidWalk {
                reason: format!("{u} and {v} are not adjacent"),
            });
        }
        steps.push((u.clone(), v.clone()));
    }

    let mut visits: BTreeMap<N, usize> = BTreeMap::new();
    for node in sequence {
        *visits.entry(node.clone()).or_default() += 1;
    }
    let repeated: Vec<N> = visits
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(node, _)| node.clone())
        .collect();

    Ok(WalkReport {
        kind: if repeated.is_empty() {
            WalkKind::Path
        } else {
            WalkKind::Walk
        },
        sequence: sequence.to_vec(),
        length: steps.len(),
        steps,
        visits,
        repeated,
    })
}
