//! Stepwise single-source shortest paths via breadth-first search.
//!
//! # Overview
//!
//! One traversal computes, for every node reachable from the source:
//!
//! - its **distance** (hop count) from the source,
//! - its **multiplicity**: the number of distinct shortest paths reaching it,
//! - its **predecessors**: the neighbors one hop closer to the source, in
//!   the order they were found.
//!
//! # Algorithm
//!
//! The frontier is a flat array with a read cursor and a write cursor.
//! Dequeuing node `i` at distance `d`, each neighbor `j` falls into exactly
//! one case, tested in order:
//!
//! 1. **First visit**: `j` has no distance yet. Set `distance[j] = d + 1`,
//!    `multiplicity[j] = multiplicity[i]`, `predecessors[j] = [i]`, and
//!    write `j` at the write cursor.
//! 2. **Tie**: `distance[j] == d + 1`. Add `multiplicity[i]` to
//!    `multiplicity[j]` and append `i` to `predecessors[j]`.
//! 3. **Longer**: `distance[j] < d + 1`. Nothing changes.
//!
//! The traversal is complete exactly when the read cursor catches up with
//! the write cursor. The dequeued prefix of the frontier array is the visit
//! order consumed (reversed) by [`crate::betweenness`].
//!
//! # Stepping
//!
//! State only changes through explicit calls:
//!
//! - [`ShortestPathBfs::step_neighbor`]: one unit of work: a dequeue, one
//!   neighbor, or the "neighbors drained" transition.
//! - [`ShortestPathBfs::step_node`]: dequeue and drain a whole node.
//! - [`ShortestPathBfs::run_to_completion`]: step until complete.
//!
//! All three reach the same final state. After completion every step call is
//! a no-op that reports [`StepEvent::Complete`] again.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// Distance sentinel for nodes the traversal has not reached.
pub(crate) const UNREACHED: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Public state types
// ---------------------------------------------------------------------------

/// Lifecycle of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Initialised; nothing dequeued yet.
    Ready,
    /// At least one node dequeued; more work may remain.
    Advancing,
    /// Read cursor caught up with write cursor.
    Complete,
}

/// How much work one `step` call performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Dequeue a node and process all its neighbors.
    #[default]
    Node,
    /// Process a single neighbor (dequeue and drain are their own steps).
    Neighbor,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Neighbor => f.write_str("neighbor"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" | "coarse" => Ok(Self::Node),
            "neighbor" | "neighbour" | "fine" => Ok(Self::Neighbor),
            other => Err(format!("unknown granularity '{other}' (expected node or neighbor)")),
        }
    }
}

/// Which of the three neighbor rules fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    FirstVisit,
    Tie,
    Longer,
}

/// The effect of examining neighbor `neighbor` of dequeued node `node`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborOutcome<N> {
    pub node: N,
    pub neighbor: N,
    pub rule: Rule,
    /// `distance[node] + 1`.
    pub candidate: u32,
    /// Distance of `neighbor` after the rule applied.
    pub distance: u32,
    /// Multiplicity of `neighbor` after the rule applied.
    pub multiplicity: u64,
}

impl<N: NodeId> NeighborOutcome<N> {
    fn describe(&self) -> String {
        let Self {
            node,
            neighbor,
            candidate,
            distance,
            multiplicity,
            ..
        } = self;
        match self.rule {
            Rule::FirstVisit => format!(
                "neighbor {neighbor}: first visit, distance {distance}, multiplicity {multiplicity}, \
                 predecessors [{node}], enqueued"
            ),
            Rule::Tie => format!(
                "neighbor {neighbor}: tie at distance {distance}, multiplicity now {multiplicity}, \
                 {node} added to predecessors"
            ),
            Rule::Longer => format!(
                "neighbor {neighbor}: already at distance {distance} < {candidate}, nothing to do"
            ),
        }
    }
}

/// What a single step call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepEvent<N> {
    /// Fine-grained: `node` was taken from the frontier.
    Dequeued { node: N, distance: u32, read: usize },
    /// Fine-grained: one neighbor was examined.
    Neighbor(NeighborOutcome<N>),
    /// Fine-grained: every neighbor of `node` has been examined.
    Drained { node: N },
    /// Coarse: `node` was dequeued (or resumed) and drained.
    NodeProcessed {
        node: N,
        distance: u32,
        outcomes: Vec<NeighborOutcome<N>>,
    },
    /// No more work; repeated on every later call.
    Complete,
}

impl<N: NodeId> StepEvent<N> {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Human-readable narration of the transition. Advisory only.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Dequeued {
                node,
                distance,
                read,
            } => format!("dequeue node {node} at distance {distance} (read cursor now {read})"),
            Self::Neighbor(outcome) => outcome.describe(),
            Self::Drained { node } => format!("finished neighbors of node {node}"),
            Self::NodeProcessed {
                node,
                distance,
                outcomes,
            } => {
                let mut text = format!("process node {node} at distance {distance}");
                if outcomes.is_empty() {
                    text.push_str(": no neighbors left");
                }
                for outcome in outcomes {
                    let _ = write!(text, "; {}", outcome.describe());
                }
                text
            }
            Self::Complete => "frontier empty (read == write), traversal complete".to_string(),
        }
    }
}

/// Per-node view of the traversal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeState<N> {
    pub node: N,
    /// `None` while unreached.
    pub distance: Option<u32>,
    /// Zero while unreached.
    pub multiplicity: u64,
    pub predecessors: Vec<N>,
}

/// Immutable copy of the whole traversal state, for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BfsSnapshot<N> {
    pub source: N,
    pub phase: Phase,
    pub steps: usize,
    pub read: usize,
    pub write: usize,
    /// Everything ever written to the frontier, in order.
    pub queue: Vec<N>,
    /// `queue[..read]`.
    pub visit_order: Vec<N>,
    /// `queue[read..]`.
    pub pending: Vec<N>,
    /// Node whose neighbors are being examined, if any.
    pub current: Option<N>,
    /// One entry per graph node, in graph order.
    pub nodes: Vec<NodeState<N>>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// ShortestPathBfs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    node: usize,
    next: usize,
}

/// A single-source traversal over a borrowed [`Graph`].
///
/// The graph is borrowed immutably for the lifetime of the run, so it cannot
/// be mutated while state derived from it is alive. To reflect an edit, drop
/// the run, edit the graph and start a new one.
#[derive(Debug, Clone)]
pub struct ShortestPathBfs<'g, N> {
    graph: &'g Graph<N>,
    source: usize,
    distance: Vec<u32>,
    multiplicity: Vec<u64>,
    predecessors: Vec<Vec<usize>>,
    /// Frontier storage. The write cursor is `queue.len()`.
    queue: Vec<usize>,
    read: usize,
    cursor: Option<Cursor>,
    phase: Phase,
    steps: usize,
    description: Option<String>,
}

impl<'g, N: NodeId> ShortestPathBfs<'g, N> {
    /// Initialise a traversal from `source`: distance 0, multiplicity 1,
    /// frontier `[source]`, read cursor 0, write cursor 1.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `source` is not in the graph.
    pub fn new(graph: &'g Graph<N>, source: &N) -> Result<Self, GraphError> {
        let s = graph.index_of(source)?;
        let n = graph.node_count();

        let mut distance = vec![UNREACHED; n];
        let mut multiplicity = vec![0; n];
        distance[s] = 0;
        multiplicity[s] = 1;

        let mut queue = Vec::with_capacity(n);
        queue.push(s);

        Ok(Self {
            graph,
            source: s,
            distance,
            multiplicity,
            predecessors: vec![Vec::new(); n],
            queue,
            read: 0,
            cursor: None,
            phase: Phase::Ready,
            steps: 0,
            description: None,
        })
    }

    /// Initialise and run to completion.
    ///
    /// # Errors
    ///
    /// Unknown source, or multiplicity overflow.
    pub fn run(graph: &'g Graph<N>, source: &N) -> Result<Self, GraphError> {
        let mut bfs = Self::new(graph, source)?;
        bfs.run_to_completion()?;
        Ok(bfs)
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance by one step of the given granularity.
    ///
    /// # Errors
    ///
    /// [`GraphError::MultiplicityOverflow`] if a path count exceeds `u64`.
    pub fn step(&mut self, granularity: Granularity) -> Result<StepEvent<N>, GraphError> {
        match granularity {
            Granularity::Node => self.step_node(),
            Granularity::Neighbor => self.step_neighbor(),
        }
    }

    /// Perform one unit of work: dequeue a node, examine one neighbor, or
    /// close out a drained node.
    ///
    /// # Errors
    ///
    /// [`GraphError::MultiplicityOverflow`] if a path count exceeds `u64`.
    pub fn step_neighbor(&mut self) -> Result<StepEvent<N>, GraphError> {
        if self.phase == Phase::Complete {
            return Ok(StepEvent::Complete);
        }

        let graph = self.graph;
        let event = match self.cursor {
            None => match self.pop_frontier() {
                Some(cursor) => StepEvent::Dequeued {
                    node: graph.id(cursor.node).clone(),
                    distance: self.distance[cursor.node],
                    read: self.read,
                },
                None => self.finish(),
            },
            Some(cursor) => match graph.neighbor_indices(cursor.node).get(cursor.next) {
                Some(&j) => {
                    let outcome = self.relax(cursor.node, j)?;
                    self.cursor = Some(Cursor {
                        next: cursor.next + 1,
                        ..cursor
                    });
                    StepEvent::Neighbor(outcome)
                }
                None => {
                    self.cursor = None;
                    StepEvent::Drained {
                        node: graph.id(cursor.node).clone(),
                    }
                }
            },
        };

        self.record(&event);
        Ok(event)
    }

    /// Dequeue the next node (or resume the current one) and examine all of
    /// its remaining neighbors.
    ///
    /// # Errors
    ///
    /// [`GraphError::MultiplicityOverflow`] if a path count exceeds `u64`.
    pub fn step_node(&mut self) -> Result<StepEvent<N>, GraphError> {
        if self.phase == Phase::Complete {
            return Ok(StepEvent::Complete);
        }

        let cursor = match self.cursor.take() {
            Some(cursor) => cursor,
            None => {
                if let Some(cursor) = self.pop_frontier() {
                    cursor
                } else {
                    let event = self.finish();
                    self.record(&event);
                    return Ok(event);
                }
            }
        };

        let graph = self.graph;
        let remaining = graph
            .neighbor_indices(cursor.node)
            .get(cursor.next..)
            .unwrap_or_default();

        let mut outcomes = Vec::with_capacity(remaining.len());
        for &j in remaining {
            match self.relax(cursor.node, j) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    // Resume at the neighbor that failed.
                    self.cursor = Some(Cursor {
                        next: cursor.next + outcomes.len(),
                        ..cursor
                    });
                    return Err(err);
                }
            }
        }
        self.cursor = None;

        let event = StepEvent::NodeProcessed {
            node: graph.id(cursor.node).clone(),
            distance: self.distance[cursor.node],
            outcomes,
        };
        self.record(&event);
        Ok(event)
    }

    /// Step until the traversal reports completion. Returns the number of
    /// steps this call performed (including the completing one).
    ///
    /// # Errors
    ///
    /// [`GraphError::MultiplicityOverflow`] if a path count exceeds `u64`.
    #[instrument(skip(self), fields(source = %self.source()))]
    pub fn run_to_completion(&mut self) -> Result<usize, GraphError> {
        let before = self.steps;
        while !self.step_node()?.is_complete() {}
        debug!(
            steps = self.steps - before,
            reached = self.reached_count(),
            "traversal complete"
        );
        Ok(self.steps - before)
    }

    fn pop_frontier(&mut self) -> Option<Cursor> {
        let &node = self.queue.get(self.read)?;
        self.read += 1;
        self.phase = Phase::Advancing;
        let cursor = Cursor { node, next: 0 };
        self.cursor = Some(cursor);
        Some(cursor)
    }

    fn finish(&mut self) -> StepEvent<N> {
        self.phase = Phase::Complete;
        self.cursor = None;
        StepEvent::Complete
    }

    /// Apply the three neighbor rules to `j` as seen from dequeued `i`.
    fn relax(&mut self, i: usize, j: usize) -> Result<NeighborOutcome<N>, GraphError> {
        let candidate = self.distance[i] + 1;

        let rule = if self.distance[j] == UNREACHED {
            self.distance[j] = candidate;
            self.multiplicity[j] = self.multiplicity[i];
            self.predecessors[j] = vec![i];
            self.queue.push(j);
            Rule::FirstVisit
        } else if self.distance[j] == candidate {
            self.multiplicity[j] = self.multiplicity[j]
                .checked_add(self.multiplicity[i])
                .ok_or_else(|| GraphError::MultiplicityOverflow {
                    node: self.graph.id(j).to_string(),
                })?;
            self.predecessors[j].push(i);
            Rule::Tie
        } else {
            Rule::Longer
        };

        Ok(NeighborOutcome {
            node: self.graph.id(i).clone(),
            neighbor: self.graph.id(j).clone(),
            rule,
            candidate,
            distance: self.distance[j],
            multiplicity: self.multiplicity[j],
        })
    }

    fn record(&mut self, event: &StepEvent<N>) {
        self.steps += 1;
        let description = event.describe();
        trace!(step = self.steps, read = self.read, write = self.queue.len(), "{description}");
        self.description = Some(description);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn graph(&self) -> &'g Graph<N> {
        self.graph
    }

    #[must_use]
    pub fn source(&self) -> &N {
        self.graph.id(self.source)
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Step calls that changed state.
    #[must_use]
    pub const fn steps_taken(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub const fn read_cursor(&self) -> usize {
        self.read
    }

    #[must_use]
    pub fn write_cursor(&self) -> usize {
        self.queue.len()
    }

    /// Narration of the most recent step.
    #[must_use]
    pub fn last_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Node whose neighbors are currently being examined.
    #[must_use]
    pub fn current_node(&self) -> Option<&N> {
        self.cursor.map(|cursor| self.graph.id(cursor.node))
    }

    /// Distance from the source, `None` if unreached.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn distance(&self, node: &N) -> Result<Option<u32>, GraphError> {
        let ix = self.graph.index_of(node)?;
        Ok(self.distance_of(ix))
    }

    /// Number of shortest paths from the source; zero if unreached.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn multiplicity(&self, node: &N) -> Result<u64, GraphError> {
        let ix = self.graph.index_of(node)?;
        Ok(self.multiplicity[ix])
    }

    /// Predecessors on shortest paths, in discovery order.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `node` is not in the graph.
    pub fn predecessors(&self, node: &N) -> Result<Vec<&N>, GraphError> {
        let ix = self.graph.index_of(node)?;
        Ok(self.ids(&self.predecessors[ix]))
    }

    /// Nodes dequeued so far, in order.
    #[must_use]
    pub fn visit_order(&self) -> Vec<&N> {
        self.ids(&self.queue[..self.read])
    }

    /// Nodes written to the frontier but not yet dequeued.
    #[must_use]
    pub fn pending(&self) -> Vec<&N> {
        self.ids(&self.queue[self.read..])
    }

    /// The whole frontier array (`[..read]` visited, `[read..]` pending).
    #[must_use]
    pub fn queue(&self) -> Vec<&N> {
        self.ids(&self.queue)
    }

    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.queue.len()
    }

    /// Copy the current state into an owned, serialisable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BfsSnapshot<N> {
        let owned = |ixs: &[usize]| -> Vec<N> {
            ixs.iter().map(|&ix| self.graph.id(ix).clone()).collect()
        };

        let nodes = (0..self.graph.node_count())
            .map(|ix| NodeState {
                node: self.graph.id(ix).clone(),
                distance: self.distance_of(ix),
                multiplicity: self.multiplicity[ix],
                predecessors: owned(&self.predecessors[ix]),
            })
            .collect();

        BfsSnapshot {
            source: self.source().clone(),
            phase: self.phase,
            steps: self.steps,
            read: self.read,
            write: self.queue.len(),
            queue: owned(&self.queue),
            visit_order: owned(&self.queue[..self.read]),
            pending: owned(&self.queue[self.read..]),
            current: self.current_node().cloned(),
            nodes,
            description: self.description.clone(),
        }
    }

    fn ids(&self, ixs: &[usize]) -> Vec<&N> {
        ixs.iter().map(|&ix| self.graph.id(ix)).collect()
    }

    fn distance_of(&self, ix: usize) -> Option<u32> {
        match self.distance[ix] {
            UNREACHED => None,
            d => Some(d),
        }
    }

    // -----------------------------------------------------------------------
    // Dense-index access for paths / betweenness
    // -----------------------------------------------------------------------

    pub(crate) const fn source_ix(&self) -> usize {
        self.source
    }

    pub(crate) fn distance_ix(&self, ix: usize) -> u32 {
        self.distance[ix]
    }

    pub(crate) fn multiplicity_ix(&self, ix: usize) -> u64 {
        self.multiplicity[ix]
    }

    pub(crate) fn predecessors_ix(&self, ix: usize) -> &[usize] {
        &self.predecessors[ix]
    }

    /// Visit order as dense indices. Equals the whole frontier once complete.
    pub(crate) fn visit_order_ix(&self) -> &[usize] {
        &self.queue[..self.read]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
