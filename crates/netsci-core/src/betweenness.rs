//! Single-source dependency accumulation.
//!
//! # Overview
//!
//! Given a COMPLETE [`ShortestPathBfs`] from source `s`, this pass assigns
//! every reached node `i` a dependency score `x[i]`: one for the node itself
//! plus the share of every longer shortest path that runs through it.
//!
//! # Algorithm
//!
//! 1. **Leaves** are reached nodes at positive distance that appear in no
//!    predecessor list. They start (and stay) at `x = 1`. Every other
//!    reached node starts at `x = 0`.
//! 2. Walk the visit order in strict reverse. For a non-leaf `i` with
//!    successors `NB(i) = { j : i ∈ predecessors[j] }`:
//!
//!    ```text
//!    x[i] = 1 + Σ_{j ∈ NB(i)} x[j] · σ[i] / σ[j]
//!    ```
//!
//!    where `σ` is the shortest-path multiplicity.
//!
//! Reverse visit order guarantees every successor is final before its
//! predecessors are scored. Unreached nodes carry no score.
//!
//! Summing these scores over sources lives in [`crate::centrality`].

use fixedbitset::FixedBitSet;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::bfs::ShortestPathBfs;
use crate::error::GraphError;
use crate::graph::NodeId;

/// One successor's share of the score assigned in an accumulation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution<N> {
    pub successor: N,
    /// Final `x[j]` of the successor.
    pub score: f64,
    /// `σ[i] / σ[j]`.
    pub ratio: f64,
    /// `x[j] · σ[i] / σ[j]`.
    pub term: f64,
}

/// The node scored by one reverse step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulationStep<N> {
    pub node: N,
    pub leaf: bool,
    /// `NB(node)` with each successor's contribution, in visit order.
    pub successors: Vec<Contribution<N>>,
    pub score: f64,
}

impl<N: NodeId> AccumulationStep<N> {
    /// Narration of the step. Advisory only.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.leaf {
            return format!("node {}: leaf, score stays 1", self.node);
        }
        let terms: Vec<String> = self
            .successors
            .iter()
            .map(|c| format!("{}·{}", fmt_score(c.score), fmt_score(c.ratio)))
            .collect();
        if terms.is_empty() {
            format!("node {}: no successors, score 1", self.node)
        } else {
            format!(
                "node {}: 1 + {} = {}",
                self.node,
                terms.join(" + "),
                fmt_score(self.score)
            )
        }
    }
}

fn fmt_score(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

/// Final scores of one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyScores<N> {
    pub source: N,
    /// `(node, x)` for every reached node, in visit order.
    pub scores: Vec<(N, f64)>,
    /// Leaf set, in visit order.
    pub leaves: Vec<N>,
    /// Every reverse step, in the order performed.
    pub steps: Vec<AccumulationStep<N>>,
}

impl<N: NodeId> DependencyScores<N> {
    /// Score of `node`, `None` if it was not reached.
    #[must_use]
    pub fn score(&self, node: &N) -> Option<f64> {
        self.scores
            .iter()
            .find(|(candidate, _)| candidate == node)
            .map(|&(_, score)| score)
    }

    #[must_use]
    pub fn is_leaf(&self, node: &N) -> bool {
        self.leaves.contains(node)
    }
}

// ---------------------------------------------------------------------------
// BetweennessAccumulator
// ---------------------------------------------------------------------------

/// Steppable reverse pass over a completed traversal.
#[derive(Debug, Clone)]
pub struct BetweennessAccumulator<'b, 'g, N> {
    bfs: &'b ShortestPathBfs<'g, N>,
    /// `successors[i]` = `NB(i)`, in visit order.
    successors: Vec<Vec<usize>>,
    leaves: FixedBitSet,
    scores: Vec<f64>,
    /// Visit-order positions still to score are `[..remaining]`.
    remaining: usize,
    history: Vec<AccumulationStep<N>>,
}

impl<'b, 'g, N: NodeId> BetweennessAccumulator<'b, 'g, N> {
    /// Prepare the reverse pass: build successor sets, detect leaves and seed
    /// scores.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotReady`] if the traversal has not completed.
    #[instrument(skip(bfs), fields(source = %bfs.source()))]
    pub fn new(bfs: &'b ShortestPathBfs<'g, N>) -> Result<Self, GraphError> {
        if !bfs.is_complete() {
            return Err(GraphError::NotReady {
                operation: "dependency accumulation",
            });
        }

        let n = bfs.graph().node_count();
        let order = bfs.visit_order_ix();

        let mut successors = vec![Vec::new(); n];
        let mut has_successor = FixedBitSet::with_capacity(n);
        for &j in order {
            for &p in bfs.predecessors_ix(j) {
                successors[p].push(j);
                has_successor.insert(p);
            }
        }

        let mut leaves = FixedBitSet::with_capacity(n);
        let mut scores = vec![0.0; n];
        for &v in order {
            if v != bfs.source_ix() && !has_successor.contains(v) {
                leaves.insert(v);
                scores[v] = 1.0;
            }
        }

        debug!(reached = order.len(), leaves = leaves.count_ones(..), "accumulator ready");
        Ok(Self {
            bfs,
            successors,
            leaves,
            scores,
            remaining: order.len(),
            history: Vec::with_capacity(order.len()),
        })
    }

    /// Score the next node in reverse visit order. `None` once the source
    /// has been scored.
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&mut self) -> Option<AccumulationStep<N>> {
        self.remaining = self.remaining.checked_sub(1)?;
        let graph = self.bfs.graph();
        let i = self.bfs.visit_order_ix()[self.remaining];

        let step = if self.leaves.contains(i) {
            AccumulationStep {
                node: graph.id(i).clone(),
                leaf: true,
                successors: Vec::new(),
                score: self.scores[i],
            }
        } else {
            let sigma_i = self.bfs.multiplicity_ix(i) as f64;
            let contributions: Vec<Contribution<N>> = self.successors[i]
                .iter()
                .map(|&j| {
                    let ratio = sigma_i / self.bfs.multiplicity_ix(j) as f64;
                    Contribution {
                        successor: graph.id(j).clone(),
                        score: self.scores[j],
                        ratio,
                        term: self.scores[j] * ratio,
                    }
                })
                .collect();
            self.scores[i] = 1.0 + contributions.iter().map(|c| c.term).sum::<f64>();
            AccumulationStep {
                node: graph.id(i).clone(),
                leaf: false,
                successors: contributions,
                score: self.scores[i],
            }
        };

        trace!(remaining = self.remaining, "{}", step.describe());
        self.history.push(step.clone());
        Some(step)
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.remaining == 0
    }

    /// Current score of `node` (final only once the pass reached it).
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn score(&self, node: &N) -> Result<f64, GraphError> {
        let ix = self.bfs.graph().index_of(node)?;
        Ok(self.scores[ix])
    }

    /// Leaf set in visit order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&N> {
        let graph = self.bfs.graph();
        self.bfs
            .visit_order_ix()
            .iter()
            .filter(|&&v| self.leaves.contains(v))
            .map(|&v| graph.id(v))
            .collect()
    }

    /// `NB(node)` in visit order.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn successors(&self, node: &N) -> Result<Vec<&N>, GraphError> {
        let graph = self.bfs.graph();
        let ix = graph.index_of(node)?;
        Ok(self.successors[ix].iter().map(|&j| graph.id(j)).collect())
    }

    /// Run the remaining steps and return the final scores.
    #[must_use]
    pub fn finish(mut self) -> DependencyScores<N> {
        while self.step().is_some() {}

        let graph = self.bfs.graph();
        let order = self.bfs.visit_order_ix();
        DependencyScores {
            source: self.bfs.source().clone(),
            scores: order
                .iter()
                .map(|&v| (graph.id(v).clone(), self.scores[v]))
                .collect(),
            leaves: self.leaves().into_iter().cloned().collect(),
            steps: self.history,
        }
    }
}

/// Accumulate dependency scores for a completed traversal in one call.
///
/// # Errors
///
/// [`GraphError::NotReady`] if the traversal has not completed.
pub fn dependency_scores<N: NodeId>(
    bfs: &ShortestPathBfs<'_, N>,
) -> Result<DependencyScores<N>, GraphError> {
    Ok(BetweennessAccumulator::new(bfs)?.finish())
}
