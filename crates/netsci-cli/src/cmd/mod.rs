pub mod betweenness;
pub mod bfs;
pub mod clustering;
pub mod completions;
pub mod fixtures;
pub mod paths;
pub mod power;
pub mod walk;
