//! Node and stats types for the dependency graph.

use std::path::PathBuf;

use serde::Serialize;

/// Canonical absolute path of a source file; the node's unique identity.
pub type NodeKey = PathBuf;

/// Lifecycle state of a node.
///
/// `Discovered → Reading → (Resolved | Unresolved | Error)`. A node ends
/// `Unresolved` when it had references but none of them mapped to a file;
/// missing dependencies never block the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeState {
    Discovered,
    Reading,
    Resolved,
    Unresolved,
    Error,
}

/// One source file's record within the dependency graph.
///
/// Outgoing edges (dependent→dependency) live in the graph arena, not
/// here; an edge target is always a node present in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: NodeKey,
    pub state: NodeState,
    /// Logical identifiers found in the text, in order, duplicates kept.
    pub raw_references: Vec<String>,
    /// File text, cached on first successful read, immutable afterwards.
    pub content: Option<String>,
    /// xxh3 of the content, when hashing is enabled.
    pub content_hash: Option<u64>,
    /// Identifiers that matched no file under any search root.
    pub unresolved: Vec<String>,
    /// References whose argument was not statically determinable.
    pub dynamic_refs: usize,
    /// Reference statements with an unusable literal argument.
    pub malformed_refs: usize,
    /// Read failure cause, for `Error` nodes.
    pub error: Option<String>,
}

impl Node {
    pub(crate) fn new(key: NodeKey) -> Self {
        Self {
            key,
            state: NodeState::Discovered,
            raw_references: Vec::new(),
            content: None,
            content_hash: None,
            unresolved: Vec::new(),
            dynamic_refs: 0,
            malformed_refs: 0,
            error: None,
        }
    }
}

/// Aggregate counts for the reporting collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub unresolved_references: usize,
    pub dynamic_references: usize,
    pub malformed_references: usize,
    pub error_nodes: usize,
}
