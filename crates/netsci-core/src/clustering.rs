//! Local and global clustering coefficients.
//!
//! The local coefficient of `v` is the fraction of pairs of `v`'s neighbors
//! that are themselves adjacent: `2e / (k(k-1))` for `k` neighbors and `e`
//! connected pairs. Pairs are checked in identifier order (`u < v`), so the
//! trace is stable regardless of adjacency order.
//!
//! The global coefficient is the fraction of paths of length two that are
//! closed into a triangle.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// One neighbor pair checked while computing a local coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCheck<N> {
    pub u: N,
    pub v: N,
    pub connected: bool,
    /// Connected pairs found so far, this one included.
    pub connected_so_far: usize,
}

/// Local clustering of one node, with the full pair trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalClustering<N> {
    pub node: N,
    /// Neighbors in identifier order.
    pub neighbors: Vec<N>,
    pub degree: usize,
    pub possible_pairs: usize,
    pub connected_pairs: Vec<(N, N)>,
    pub checks: Vec<PairCheck<N>>,
    pub coefficient: f64,
}

/// Local clustering coefficient of `node`.
///
/// # Errors
///
/// [`GraphError::UnknownNode`] if `node` is absent, or
/// [`GraphError::DegreeTooLow`] if it has fewer than two neighbors.
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph))]
pub fn local_clustering<N: NodeId>(
    graph: &Graph<N>,
    node: &N,
) -> Result<LocalClustering<N>, GraphError> {
    let ix = graph.index_of(node)?;
    let mut neighbors = graph.neighbor_indices(ix).to_vec();
    let k = neighbors.len();
    if k < 2 {
        return Err(GraphError::DegreeTooLow {
            node: node.to_string(),
            degree: k,
        });
    }
    neighbors.sort_by(|&a, &b| graph.id(a).cmp(graph.id(b)));

    let mut checks = Vec::with_capacity(k * (k - 1) / 2);
    let mut connected_pairs = Vec::new();
    for (i, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[i + 1..] {
            let connected = graph.has_edge_ix(a, b);
            if connected {
                connected_pairs.push((graph.id(a).clone(), graph.id(b).clone()));
            }
            checks.push(PairCheck {
                u: graph.id(a).clone(),
                v: graph.id(b).clone(),
                connected,
                connected_so_far: connected_pairs.len(),
            });
        }
    }

    let possible_pairs = checks.len();
    let coefficient = connected_pairs.len() as f64 / possible_pairs as f64;
    debug!(
        degree = k,
        connected = connected_pairs.len(),
        coefficient,
        "local clustering computed"
    );

    Ok(LocalClustering {
        node: node.clone(),
        neighbors: neighbors.iter().map(|&n| graph.id(n).clone()).collect(),
        degree: k,
        possible_pairs,
        connected_pairs,
        checks,
        coefficient,
    })
}

/// Local coefficient with the common convention that nodes of degree 0 or
/// 1 score zero.
///
/// # Errors
///
/// [`GraphError::UnknownNode`] if `node` is absent.
pub fn coefficient_or_zero<N: NodeId>(graph: &Graph<N>, node: &N) -> Result<f64, GraphError> {
    match local_clustering(graph, node) {
        Ok(local) => Ok(local.coefficient),
        Err(err) if err.is_degree_too_low() => Ok(0.0),
        Err(err) => Err(err),
    }
}

/// Path-of-length-two counts for the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalClustering {
    /// Ordered neighbor pairs `(i, j)`, `i ≠ j`, summed over centre nodes.
    pub paths_of_length_two: usize,
    /// Those whose endpoints are adjacent.
    pub closed_paths: usize,
    pub coefficient: f64,
}

/// Global clustering coefficient: closed paths of length two over all
/// paths of length two. Zero when the graph has none.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn global_clustering<N: NodeId>(graph: &Graph<N>) -> GlobalClustering {
    let mut paths = 0;
    let mut closed = 0;
    for centre in 0..graph.node_count() {
        let neighbors = graph.neighbor_indices(centre);
        for &i in neighbors {
            for &j in neighbors {
                if i == j {
                    continue;
                }
                paths += 1;
                if graph.has_edge_ix(i, j) {
                    closed += 1;
                }
            }
        }
    }

    let coefficient = if paths == 0 {
        0.0
    } else {
        closed as f64 / paths as f64
    };
    debug!(paths, closed, coefficient, "global clustering computed");
    GlobalClustering {
        paths_of_length_two: paths,
        closed_paths: closed,
        coefficient,
    }
}

/// Whether the edge `u-v` closes a triangle, i.e. `u` and `v` share a
/// neighbor. The edge itself need not exist.
///
/// # Errors
///
/// [`GraphError::UnknownNode`] if either endpoint is absent.
pub fn edge_in_triangle<N: NodeId>(graph: &Graph<N>, u: &N, v: &N) -> Result<bool, GraphError> {
    let a = graph.index_of(u)?;
    let b = graph.index_of(v)?;
    Ok(graph
        .neighbor_indices(a)
        .iter()
        .any(|&w| w != b && graph.has_edge_ix(w, b)))
}
