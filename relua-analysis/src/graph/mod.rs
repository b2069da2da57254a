//! Dependency graph subsystem — arena-backed graph, snapshot view, and
//! cycle-tolerant linearization.

pub mod dependency_graph;
pub mod linearize;
pub mod types;

pub use dependency_graph::{DependencyGraph, GraphSnapshot};
pub use linearize::{linearize, CycleGroup, Linearization};
pub use types::{GraphStats, Node, NodeKey, NodeState};
