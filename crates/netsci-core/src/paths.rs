//! Enumerate every shortest path from a completed traversal.
//!
//! Paths are expanded backwards from the target through the predecessor
//! lists. Each path is a source-to-target node sequence. The order of the
//! returned list follows predecessor discovery order, which follows the
//! graph's adjacency order.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::bfs::{ShortestPathBfs, UNREACHED};
use crate::error::GraphError;
use crate::graph::NodeId;

/// All shortest paths from the traversal source to one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPaths<N> {
    pub source: N,
    pub target: N,
    /// `None` when the target is unreachable.
    pub distance: Option<u32>,
    pub paths: Vec<Vec<N>>,
}

impl<N> ShortestPaths<N> {
    #[must_use]
    pub fn count(&self) -> usize {
        self.paths.len()
    }
}

/// Walks the predecessor lists of a completed [`ShortestPathBfs`].
#[derive(Debug, Clone, Copy)]
pub struct PathReconstructor<'b, 'g, N> {
    bfs: &'b ShortestPathBfs<'g, N>,
}

impl<'b, 'g, N: NodeId> PathReconstructor<'b, 'g, N> {
    /// # Errors
    ///
    /// [`GraphError::NotReady`] if the traversal has not completed.
    pub fn new(bfs: &'b ShortestPathBfs<'g, N>) -> Result<Self, GraphError> {
        if !bfs.is_complete() {
            return Err(GraphError::NotReady {
                operation: "path reconstruction",
            });
        }
        Ok(Self { bfs })
    }

    /// Every shortest path from the source to `target`.
    ///
    /// The source alone yields `[[source]]`; an unreachable target yields an
    /// empty list. The number of paths equals the target's multiplicity.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `target` is not in the graph.
    #[instrument(skip(self), fields(source = %self.bfs.source()))]
    pub fn all_shortest_paths(&self, target: &N) -> Result<ShortestPaths<N>, GraphError> {
        let graph = self.bfs.graph();
        let t = graph.index_of(target)?;

        let mut paths = Vec::new();
        if self.bfs.distance_ix(t) != UNREACHED {
            self.expand(t, &mut paths);
        }

        debug!(target = %target, paths = paths.len(), "paths reconstructed");
        Ok(ShortestPaths {
            source: self.bfs.source().clone(),
            target: target.clone(),
            distance: self.bfs.distance(target)?,
            paths: paths
                .into_iter()
                .map(|path| path.into_iter().map(|ix| graph.id(ix).clone()).collect())
                .collect(),
        })
    }

    /// Shortest paths to every reachable node, in visit order.
    #[must_use]
    pub fn all_shortest_paths_from_source(&self) -> Vec<ShortestPaths<N>> {
        let graph = self.bfs.graph();
        self.bfs
            .visit_order_ix()
            .iter()
            .map(|&t| {
                let mut paths = Vec::new();
                self.expand(t, &mut paths);
                ShortestPaths {
                    source: self.bfs.source().clone(),
                    target: graph.id(t).clone(),
                    distance: Some(self.bfs.distance_ix(t)),
                    paths: paths
                        .into_iter()
                        .map(|path| path.into_iter().map(|ix| graph.id(ix).clone()).collect())
                        .collect(),
                }
            })
            .collect()
    }

    /// Number of shortest paths to `target` without enumerating them.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `target` is not in the graph.
    pub fn path_count(&self, target: &N) -> Result<u64, GraphError> {
        self.bfs.multiplicity(target)
    }

    /// Depth-first over the predecessor lists on an explicit stack.
    /// Each frame is `(node, next predecessor to try)`; the frames spell the
    /// current partial path target-first.
    fn expand(&self, target: usize, out: &mut Vec<Vec<usize>>) {
        let source = self.bfs.source_ix();
        let mut stack = vec![(target, 0_usize)];
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            if node == source {
                out.push(stack.iter().rev().map(|&(ix, _)| ix).collect());
                stack.pop();
                continue;
            }
            if let Some(&pred) = self.bfs.predecessors_ix(node).get(top.1) {
                top.1 += 1;
                stack.push((pred, 0));
            } else {
                stack.pop();
            }
        }
    }
}
