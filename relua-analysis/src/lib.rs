//! relua-analysis: the restoration engine.
//!
//! Turns a scattered set of decompiled source files into a validated
//! dependency graph with a deterministic processing order:
//! - Resolver: logical module identifiers to concrete file paths
//! - Extract: `require` statements to tagged reference outcomes
//! - Graph: arena-backed dependency graph with snapshot views
//! - Linearize: Tarjan SCC + cycle-tolerant topological order
//! - Discovery: worklist driver with parallel reads, single-writer graph
//! - Pipeline: ordered restoration plan and collaborator hand-off

pub mod discovery;
pub mod extract;
pub mod graph;
pub mod hasher;
pub mod pipeline;
pub mod resolver;

// Re-exports for convenience
pub use discovery::{DiscoveryDriver, FsContentSource};
pub use extract::{extract_references, ExtractedRef};
pub use graph::{
    linearize, CycleGroup, DependencyGraph, GraphSnapshot, GraphStats, Linearization, Node,
    NodeKey, NodeState,
};
pub use pipeline::{
    discover, restore_in_order, PlanSummary, RestorationPlan, RestorationRecord, RestoredFile,
    Restorer,
};
pub use resolver::{ModuleResolver, Resolution};
