//! Undirected simple graphs for the course algorithms.
//!
//! # Overview
//!
//! [`Graph`] stores an undirected simple graph over opaque node ids. Ids are
//! mapped once to dense internal indices so every algorithm in this crate can
//! keep its per-node state in plain `Vec`s.
//!
//! ## Pipeline
//!
//! ```text
//! netsci.toml / graph file / built-in fixture
//!        ↓  file::GraphFile::load() / fixtures::Fixture::graph()
//! Graph (insertion-ordered adjacency lists)
//!        ↓  bfs::ShortestPathBfs::new()
//! stepwise traversal → paths / betweenness
//! ```
//!
//! ## Adjacency Order
//!
//! Neighbor lists keep insertion order. Traversal order, predecessor order
//! and path enumeration order all follow it, so two graphs with the same
//! edge set but different insertion order may produce differently ordered
//! (but equal as sets) results.

pub mod file;
pub mod model;

pub use file::GraphFile;
pub use model::{Graph, NodeId};
