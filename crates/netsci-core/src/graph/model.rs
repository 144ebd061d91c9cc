//! The [`Graph`] type: an undirected simple graph with ordered adjacency.
//!
//! ## Invariants
//!
//! - No self-loops and no parallel edges.
//! - Symmetry: `v ∈ neighbors(u)` iff `u ∈ neighbors(v)`.
//! - Neighbor lists keep insertion order; removing an edge keeps the
//!   relative order of the remaining neighbors.
//!
//! Membership queries (`has_edge`, `contains`) go through hash sets and are
//! O(1) amortized. Algorithms in this crate work on the dense indices
//! exposed to the crate through `index_of` / `neighbor_indices`.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, instrument};

use crate::error::{EdgeRejection, GraphError};

/// Requirements on node identifiers.
///
/// Ids are opaque: the engine only compares, hashes, orders and prints them.
/// `Ord` provides the canonical `u < v` order used by clustering pair
/// enumeration.
pub trait NodeId: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected simple graph over node ids of type `N`.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    /// Node ids in insertion order; position = dense index.
    ids: Vec<N>,
    /// Id → dense index.
    index: HashMap<N, usize>,
    /// Dense index → neighbor indices in insertion order.
    adjacency: Vec<Vec<usize>>,
    /// Canonical `(min, max)` index pairs.
    edges: HashSet<(usize, usize)>,
}

const fn canonical(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl<N: NodeId> Default for Graph<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N: NodeId> Graph<N> {
    /// A graph with no nodes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ids: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edges: HashSet::new(),
        }
    }

    /// A graph with the given nodes and no edges.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if an id is listed twice.
    pub fn with_nodes(nodes: impl IntoIterator<Item = N>) -> Result<Self, GraphError> {
        let mut graph = Self::empty();
        for node in nodes {
            graph.add_node(node)?;
        }
        Ok(graph)
    }

    /// Build a graph from an explicit node list and an edge list.
    ///
    /// Edges are inserted in order, so each neighbor list follows the order in
    /// which its edges appear.
    ///
    /// # Errors
    ///
    /// Fails on duplicate nodes, edges naming unknown nodes, self-loops and
    /// duplicate edges.
    pub fn new(
        nodes: impl IntoIterator<Item = N>,
        edges: impl IntoIterator<Item = (N, N)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::with_nodes(nodes)?;
        for (u, v) in edges {
            graph.add_edge(&u, &v)?;
        }
        Ok(graph)
    }

    /// Build a graph from edges alone; nodes appear in order of first mention.
    ///
    /// # Errors
    ///
    /// Fails on self-loops and duplicate edges.
    pub fn from_edges(edges: impl IntoIterator<Item = (N, N)>) -> Result<Self, GraphError> {
        let mut graph = Self::empty();
        for (u, v) in edges {
            if !graph.contains(&u) {
                graph.add_node(u.clone())?;
            }
            if !graph.contains(&v) {
                graph.add_node(v.clone())?;
            }
            graph.add_edge(&u, &v)?;
        }
        Ok(graph)
    }

    /// Build a graph from ordered adjacency lists, keeping each list's order
    /// exactly as given.
    ///
    /// Every node must appear as a key. The lists must be symmetric.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] for a neighbor that is not a key,
    /// [`GraphError::InvalidEdge`] for self-loops, repeated neighbors or
    /// asymmetric lists, [`GraphError::DuplicateNode`] for repeated keys.
    #[instrument(skip(lists))]
    pub fn from_adjacency<I, L>(lists: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        let lists: Vec<(N, Vec<N>)> = lists
            .into_iter()
            .map(|(node, neighbors)| (node, neighbors.into_iter().collect()))
            .collect();

        let mut graph = Self::with_nodes(lists.iter().map(|(node, _)| node.clone()))?;

        for (node, neighbors) in &lists {
            let u = graph.index_of(node)?;
            for neighbor in neighbors {
                let v = graph.index_of(neighbor)?;
                if u == v {
                    return Err(graph.rejected(u, v, EdgeRejection::SelfLoop));
                }
                if graph.adjacency[u].contains(&v) {
                    return Err(graph.rejected(u, v, EdgeRejection::Duplicate));
                }
                graph.adjacency[u].push(v);
            }
        }

        for u in 0..graph.ids.len() {
            for &v in &graph.adjacency[u] {
                if !graph.adjacency[v].contains(&u) {
                    return Err(GraphError::InvalidEdge {
                        u: graph.ids[v].to_string(),
                        v: graph.ids[u].to_string(),
                        reason: EdgeRejection::Asymmetric,
                    });
                }
                graph.edges.insert(canonical(u, v));
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph built from adjacency lists"
        );
        Ok(graph)
    }

    /// The complete graph on `nodes`.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if an id is listed twice.
    pub fn complete(nodes: impl IntoIterator<Item = N>) -> Result<Self, GraphError> {
        let mut graph = Self::with_nodes(nodes)?;
        let n = graph.ids.len();
        for u in 0..n {
            for v in (u + 1)..n {
                graph.link(u, v);
            }
        }
        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add an isolated node.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateNode`] if the id is already present.
    pub fn add_node(&mut self, node: N) -> Result<(), GraphError> {
        if self.index.contains_key(&node) {
            return Err(GraphError::DuplicateNode {
                node: node.to_string(),
            });
        }
        self.index.insert(node.clone(), self.ids.len());
        self.ids.push(node);
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Add the undirected edge `u-v`, appending to both neighbor lists.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidEdge`] for a self-loop or an existing edge,
    /// [`GraphError::UnknownNode`] if either endpoint is missing.
    pub fn add_edge(&mut self, u: &N, v: &N) -> Result<(), GraphError> {
        let a = self.index_of(u)?;
        let b = self.index_of(v)?;
        if a == b {
            return Err(self.rejected(a, b, EdgeRejection::SelfLoop));
        }
        if self.edges.contains(&canonical(a, b)) {
            return Err(self.rejected(a, b, EdgeRejection::Duplicate));
        }
        self.link(a, b);
        debug!(%u, %v, "edge added");
        Ok(())
    }

    /// Remove the undirected edge `u-v`.
    ///
    /// # Errors
    ///
    /// [`GraphError::EdgeNotFound`] if the edge is absent,
    /// [`GraphError::UnknownNode`] if either endpoint is missing.
    pub fn remove_edge(&mut self, u: &N, v: &N) -> Result<(), GraphError> {
        let a = self.index_of(u)?;
        let b = self.index_of(v)?;
        if !self.edges.remove(&canonical(a, b)) {
            return Err(GraphError::EdgeNotFound {
                u: u.to_string(),
                v: v.to_string(),
            });
        }
        self.adjacency[a].retain(|&x| x != b);
        self.adjacency[b].retain(|&x| x != a);
        debug!(%u, %v, "edge removed");
        Ok(())
    }

    /// Add `u-v` if absent, remove it if present. Returns whether the edge
    /// exists afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`Graph::add_edge`] / [`Graph::remove_edge`].
    pub fn toggle_edge(&mut self, u: &N, v: &N) -> Result<bool, GraphError> {
        if self.has_edge(u, v)? {
            self.remove_edge(u, v)?;
            Ok(false)
        } else {
            self.add_edge(u, v)?;
            Ok(true)
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Neighbors of `u` in insertion order.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `u` is missing.
    pub fn neighbors(&self, u: &N) -> Result<Vec<&N>, GraphError> {
        let a = self.index_of(u)?;
        Ok(self.adjacency[a].iter().map(|&b| &self.ids[b]).collect())
    }

    /// Whether the edge `u-v` exists.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if either endpoint is missing.
    pub fn has_edge(&self, u: &N, v: &N) -> Result<bool, GraphError> {
        let a = self.index_of(u)?;
        let b = self.index_of(v)?;
        Ok(self.has_edge_ix(a, b))
    }

    /// Number of neighbors of `u`.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `u` is missing.
    pub fn degree(&self, u: &N) -> Result<usize, GraphError> {
        let a = self.index_of(u)?;
        Ok(self.adjacency[a].len())
    }

    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Node ids in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.ids
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Every edge once, lower-index endpoint first, in adjacency order.
    #[must_use]
    pub fn edges(&self) -> Vec<(&N, &N)> {
        let mut out = Vec::with_capacity(self.edges.len());
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &v in neighbors {
                if u < v {
                    out.push((&self.ids[u], &self.ids[v]));
                }
            }
        }
        out
    }

    /// BLAKE3 fingerprint of the node set and edge set.
    ///
    /// Independent of insertion order, so removing and re-adding an edge
    /// yields the same hash. Callers compare it against the hash taken when
    /// a traversal started to notice that the graph changed underneath.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut nodes: Vec<&N> = self.ids.iter().collect();
        nodes.sort();

        let mut edges: Vec<(&N, &N)> = self
            .edges()
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        edges.sort();

        let mut hasher = blake3::Hasher::new();
        for node in nodes {
            hasher.update(node.to_string().as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for (a, b) in edges {
            hasher.update(a.to_string().as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.to_string().as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// An equivalent petgraph `UnGraph`, node weights = ids, node indices in
    /// the same order as [`Graph::nodes`].
    #[must_use]
    pub fn to_petgraph(&self) -> UnGraph<N, ()> {
        let mut graph = UnGraph::<N, ()>::with_capacity(self.ids.len(), self.edges.len());
        for id in &self.ids {
            graph.add_node(id.clone());
        }
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &v in neighbors {
                if u < v {
                    graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
                }
            }
        }
        graph
    }

    // -----------------------------------------------------------------------
    // Dense-index access for the algorithms in this crate
    // -----------------------------------------------------------------------

    pub(crate) fn index_of(&self, node: &N) -> Result<usize, GraphError> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| GraphError::unknown(node))
    }

    pub(crate) fn id(&self, ix: usize) -> &N {
        &self.ids[ix]
    }

    pub(crate) fn neighbor_indices(&self, ix: usize) -> &[usize] {
        &self.adjacency[ix]
    }

    pub(crate) fn has_edge_ix(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&canonical(a, b))
    }

    fn link(&mut self, a: usize, b: usize) {
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edges.insert(canonical(a, b));
    }

    fn rejected(&self, a: usize, b: usize, reason: EdgeRejection) -> GraphError {
        GraphError::InvalidEdge {
            u: self.ids[a].to_string(),
            v: self.ids[b].to_string(),
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chord_cycle() -> Graph<u32> {
        Graph::from_adjacency([
            (0, vec![1, 2]),
            (1, vec![0, 2, 3]),
            (2, vec![0, 1, 4]),
            (3, vec![1, 4]),
            (4, vec![2, 3]),
        ])
        .expect("valid adjacency")
    }

    #[test]
    fn repeated_node_id_rejected() {
        let err = Graph::new([1u32, 2, 1], [(1, 2)]).expect_err("duplicate");
        assert_eq!(err, GraphError::DuplicateNode { node: "1".to_string() });
        assert_eq!(err.code(), crate::error::ErrorCode::DuplicateNode);
    }

    #[test]
    fn add_node_on_existing_id_leaves_graph_unchanged() {
        let mut g = chord_cycle();
        let hash = g.content_hash();
        assert!(matches!(
            g.add_node(3),
            Err(GraphError::DuplicateNode { ref node }) if node == "3"
        ));
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.neighbors(&3).expect("node 3"), vec![&1, &4]);
        assert_eq!(g.content_hash(), hash);
    }

    #[test]
    fn adjacency_order_is_preserved() {
        let g = chord_cycle();
        assert_eq!(g.neighbors(&1).expect("node 1"), vec![&0, &2, &3]);
        assert_eq!(g.neighbors(&4).expect("node 4"), vec![&2, &3]);
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn edge_list_construction_matches_adjacency() {
        let g = Graph::new(
            0..5u32,
            [(0, 1), (0, 2), (1, 2), (1, 3), (2, 4), (3, 4)],
        )
        .expect("valid edges");
        let h = chord_cycle();
        for node in 0..5u32 {
            assert_eq!(g.neighbors(&node).ok(), h.neighbors(&node).ok());
        }
    }

    #[test]
    fn self_loop_rejected() {
        let mut g = Graph::with_nodes([1u32, 2]).expect("nodes");
        let err = g.add_edge(&1, &1).expect_err("self-loop");
        assert!(matches!(
            err,
            GraphError::InvalidEdge {
                reason: EdgeRejection::SelfLoop,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_edge_rejected_in_either_direction() {
        let mut g = Graph::new([1u32, 2], [(1, 2)]).expect("graph");
        let err = g.add_edge(&2, &1).expect_err("duplicate");
        assert!(matches!(
            err,
            GraphError::InvalidEdge {
                reason: EdgeRejection::Duplicate,
                ..
            }
        ));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn remove_missing_edge_fails() {
        let mut g = Graph::new([1u32, 2, 3], [(1, 2)]).expect("graph");
        assert_eq!(
            g.remove_edge(&1, &3),
            Err(GraphError::EdgeNotFound {
                u: "1".to_string(),
                v: "3".to_string()
            })
        );
    }

    #[test]
    fn unknown_node_is_reported() {
        let g = chord_cycle();
        assert_eq!(
            g.neighbors(&9),
            Err(GraphError::UnknownNode {
                node: "9".to_string()
            })
        );
        assert!(g.has_edge(&0, &9).is_err());
    }

    #[test]
    fn asymmetric_adjacency_rejected() {
        let err = Graph::from_adjacency([(0u32, vec![1]), (1, vec![])]).expect_err("asymmetric");
        assert!(matches!(
            err,
            GraphError::InvalidEdge {
                reason: EdgeRejection::Asymmetric,
                ..
            }
        ));
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut g = chord_cycle();
        g.remove_edge(&1, &2).expect("edge exists");
        assert_eq!(g.neighbors(&1).expect("node 1"), vec![&0, &3]);
        assert_eq!(g.neighbors(&2).expect("node 2"), vec![&0, &4]);
        assert!(!g.has_edge(&2, &1).expect("known nodes"));
    }

    #[test]
    fn toggle_round_trip_restores_hash() {
        let mut g = chord_cycle();
        let before = g.content_hash();
        assert!(!g.toggle_edge(&0, &1).expect("toggle off"));
        assert_ne!(g.content_hash(), before);
        assert!(g.toggle_edge(&0, &1).expect("toggle on"));
        assert_eq!(g.content_hash(), before);
        assert!(before.starts_with("blake3:"));
    }

    #[test]
    fn complete_graph_has_all_pairs() {
        let g = Graph::complete(["a", "b", "c", "d"]).expect("complete");
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.degree(&"c").expect("c"), 3);
    }

    #[test]
    fn petgraph_view_matches() {
        let g = chord_cycle();
        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 5);
        assert_eq!(pg.edge_count(), 6);
        assert_eq!(pg[NodeIndex::new(3)], 3);
    }

    #[test]
    fn from_edges_orders_nodes_by_first_mention() {
        let g = Graph::from_edges([("b", "a"), ("a", "c")]).expect("graph");
        assert_eq!(g.nodes(), &["b", "a", "c"]);
    }
}
