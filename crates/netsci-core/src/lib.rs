//! netsci-core library.
//!
//! Stepwise network-science algorithms over undirected simple graphs:
//! breadth-first shortest paths with multiplicities and predecessor sets,
//! single-source dependency accumulation (betweenness), clustering
//! coefficients, walk classification and adjacency-matrix powers.
//!
//! ```text
//! Graph ──► ShortestPathBfs ──► PathReconstructor
//!   │              └──────────► BetweennessAccumulator ──► centrality (all sources)
//!   ├──► clustering
//!   ├──► walks
//!   └──► matrix
//! ```
//!
//! # Conventions
//!
//! - **Errors**: algorithms return [`GraphError`]; config and file loading use `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`debug!` per run, `trace!` per step).
//! - **Determinism**: no hash iteration order leaks into results.

#![forbid(unsafe_code)]

pub mod betweenness;
pub mod bfs;
pub mod centrality;
pub mod clustering;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod graph;
pub mod matrix;
pub mod paths;
pub mod walks;

pub use betweenness::{BetweennessAccumulator, DependencyScores};
pub use bfs::{BfsSnapshot, Granularity, ShortestPathBfs, StepEvent};
pub use error::{ErrorCode, GraphError};
pub use fixtures::Fixture;
pub use graph::{Graph, GraphFile, NodeId};
pub use paths::PathReconstructor;
