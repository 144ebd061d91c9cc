//! Adjacency matrices and their powers.
//!
//! Entry `(i, j)` of `A^k` counts the walks of length `k` from node `i` to
//! node `j`. Products use checked integer arithmetic, so large powers report
//! [`GraphError::WalkCountOverflow`] instead of wrapping.

use nalgebra::DMatrix;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// Symmetric 0/1 adjacency matrix in graph node order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix<N> {
    nodes: Vec<N>,
    matrix: DMatrix<u64>,
}

/// A computed power, ready for display or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixPower<N> {
    pub nodes: Vec<N>,
    pub power: u32,
    /// Row-major entries.
    pub rows: Vec<Vec<u64>>,
}

impl<N> MatrixPower<N> {
    /// Sum of all entries: the number of walks of this length overall.
    #[must_use]
    pub fn total_walks(&self) -> u64 {
        self.rows.iter().flatten().fold(0, |acc, &x| acc.saturating_add(x))
    }
}

impl<N: NodeId> AdjacencyMatrix<N> {
    #[must_use]
    pub fn from_graph(graph: &Graph<N>) -> Self {
        let n = graph.node_count();
        let mut matrix = DMatrix::<u64>::zeros(n, n);
        for i in 0..n {
            for &j in graph.neighbor_indices(i) {
                matrix[(i, j)] = 1;
            }
        }
        Self {
            nodes: graph.nodes().to_vec(),
            matrix,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<u64> {
        &self.matrix
    }

    /// `A^k`; `A^0` is the identity.
    ///
    /// # Errors
    ///
    /// [`GraphError::WalkCountOverflow`] if an entry exceeds `u64`.
    #[instrument(skip(self), fields(n = self.nodes.len()))]
    pub fn power(&self, k: u32) -> Result<MatrixPower<N>, GraphError> {
        let n = self.nodes.len();
        let mut result = DMatrix::<u64>::identity(n, n);
        for _ in 0..k {
            result = checked_mul(&result, &self.matrix)
                .ok_or(GraphError::WalkCountOverflow { power: k })?;
        }
        debug!(power = k, "matrix power computed");
        Ok(MatrixPower {
            nodes: self.nodes.clone(),
            power: k,
            rows: result
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
        })
    }

    /// Number of walks of length `k` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] for an absent endpoint,
    /// [`GraphError::WalkCountOverflow`] if the count exceeds `u64`.
    pub fn walk_count(&self, from: &N, to: &N, k: u32) -> Result<u64, GraphError> {
        let i = self.position(from)?;
        let j = self.position(to)?;
        let power = self.power(k)?;
        Ok(power.rows[i][j])
    }

    fn position(&self, node: &N) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|candidate| candidate == node)
            .ok_or_else(|| GraphError::unknown(node))
    }
}

/// Row-by-column product, `None` on overflow.
fn checked_mul(a: &DMatrix<u64>, b: &DMatrix<u64>) -> Option<DMatrix<u64>> {
    let (rows, inner) = a.shape();
    let cols = b.ncols();
    let mut out = DMatrix::<u64>::zeros(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            let mut sum: u64 = 0;
            for m in 0..inner {
                sum = sum.checked_add(a[(i, m)].checked_mul(b[(m, j)])?)?;
            }
            out[(i, j)] = sum;
        }
    }
    Some(out)
}

/// List every walk of exactly `k` edges from `from` to `to`, following
/// adjacency order. The count equals `A^k[from][to]`.
///
/// # Errors
///
/// [`GraphError::UnknownNode`] for an absent endpoint.
pub fn enumerate_walks<N: NodeId>(
    graph: &Graph<N>,
    from: &N,
    to: &N,
    k: u32,
) -> Result<Vec<Vec<N>>, GraphError> {
    let start = graph.index_of(from)?;
    let end = graph.index_of(to)?;

    let mut out = Vec::new();
    let mut prefix = vec![start];
    extend_walks(graph, end, k, &mut prefix, &mut out);

    Ok(out
        .into_iter()
        .map(|walk| walk.into_iter().map(|ix| graph.id(ix).clone()).collect())
        .collect())
}

fn extend_walks<N: NodeId>(
    graph: &Graph<N>,
    end: usize,
    remaining: u32,
    prefix: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    let Some(&last) = prefix.last() else {
        return;
    };
    if remaining == 0 {
        if last == end {
            out.push(prefix.clone());
        }
        return;
    }
    for &next in graph.neighbor_indices(last) {
        prefix.push(next);
        extend_walks(graph, end, remaining - 1, prefix, out);
        prefix.pop();
    }
}
