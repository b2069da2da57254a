//! Arena-backed dependency graph with idempotent mutation.
//!
//! Nodes live in a petgraph arena; a key→index map resolves canonical
//! paths, and edges are stored as index references. Cyclic file
//! relationships are safe because nothing owns anything else — lookups
//! only. The graph is append-only during discovery; `snapshot()` hands
//! out a read-only view whose shared borrow statically excludes mutation
//! while linearization runs.

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::Direction;

use relua_core::types::collections::FxHashMap;

use super::types::{GraphStats, Node, NodeKey, NodeState};

/// The mutable dependency graph built during discovery.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    arena: StableDiGraph<Node, ()>,
    index: FxHashMap<NodeKey, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node in state `Discovered`. Idempotent: re-inserting an
    /// existing key changes nothing. Returns true if the node was created.
    pub fn insert_node(&mut self, key: NodeKey) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let idx = self.arena.add_node(Node::new(key.clone()));
        self.index.insert(key, idx);
        true
    }

    /// Add the edge `from → to` (dependent → dependency).
    ///
    /// Idempotent: an existing edge is left alone. If `to` is not yet a
    /// node it is created in state `Discovered`. Self-loops are legal;
    /// they surface later as 1-node cycle groups. Returns true if the
    /// dependency node was newly created.
    pub fn add_edge(&mut self, from: &NodeKey, to: &NodeKey) -> bool {
        self.insert_node(from.clone());
        let created = self.insert_node(to.clone());
        let (a, b) = match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => (a, b),
            // Unreachable: both inserted above.
            _ => return created,
        };
        if self.arena.find_edge(a, b).is_none() {
            self.arena.add_edge(a, b, ());
        }
        created
    }

    /// Mark a node as failed. The node and its already-added edges stay in
    /// place; its outgoing edge set may be incomplete and consumers must
    /// treat it as a dead end.
    pub fn mark_error(&mut self, key: &NodeKey, cause: impl Into<String>) {
        if let Some(node) = self.node_mut(key) {
            node.state = NodeState::Error;
            node.error = Some(cause.into());
        }
    }

    /// Set a node's state.
    pub fn set_state(&mut self, key: &NodeKey, state: NodeState) {
        if let Some(node) = self.node_mut(key) {
            node.state = state;
        }
    }

    /// Cache a node's content. First write wins; content is immutable after
    /// the first successful read.
    pub fn set_content(&mut self, key: &NodeKey, content: String, hash: Option<u64>) {
        if let Some(node) = self.node_mut(key) {
            if node.content.is_none() {
                node.content = Some(content);
                node.content_hash = hash;
            }
        }
    }

    /// Append a raw reference identifier (duplicates kept, order preserved).
    pub fn push_raw_reference(&mut self, key: &NodeKey, identifier: &str) {
        if let Some(node) = self.node_mut(key) {
            node.raw_references.push(identifier.to_string());
        }
    }

    /// Record an identifier that resolved to no file.
    pub fn record_unresolved(&mut self, key: &NodeKey, identifier: String) {
        if let Some(node) = self.node_mut(key) {
            node.unresolved.push(identifier);
        }
    }

    /// Count a dynamic reference.
    pub fn record_dynamic(&mut self, key: &NodeKey) {
        if let Some(node) = self.node_mut(key) {
            node.dynamic_refs += 1;
        }
    }

    /// Count a malformed reference.
    pub fn record_malformed(&mut self, key: &NodeKey) {
        if let Some(node) = self.node_mut(key) {
            node.malformed_refs += 1;
        }
    }

    /// Settle a node's terminal state after all its references were
    /// processed: `Unresolved` when it had references and none resolved,
    /// `Resolved` otherwise. `Error` nodes are left alone.
    pub fn finalize_node(&mut self, key: &NodeKey) {
        let deps_empty = self.dependencies_of(key).is_empty();
        if let Some(node) = self.node_mut(key) {
            if node.state == NodeState::Error {
                return;
            }
            node.state = if !node.raw_references.is_empty() && deps_empty {
                NodeState::Unresolved
            } else {
                NodeState::Resolved
            };
        }
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.index.get(key).and_then(|&idx| self.arena.node_weight(idx))
    }

    fn node_mut(&mut self, key: &NodeKey) -> Option<&mut Node> {
        self.index
            .get(key)
            .copied()
            .and_then(|idx| self.arena.node_weight_mut(idx))
    }

    pub fn node_count(&self) -> usize {
        self.arena.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.arena.edge_count()
    }

    /// Outgoing dependencies of a node, lexicographically sorted.
    pub fn dependencies_of(&self, key: &NodeKey) -> Vec<&NodeKey> {
        let Some(&idx) = self.index.get(key) else {
            return Vec::new();
        };
        let mut deps: Vec<&NodeKey> = self
            .arena
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.arena.node_weight(n))
            .map(|node| &node.key)
            .collect();
        deps.sort_unstable();
        deps
    }

    /// All node keys, lexicographically sorted.
    pub fn node_keys(&self) -> Vec<&NodeKey> {
        let mut keys: Vec<&NodeKey> = self.index.keys().collect();
        keys.sort_unstable();
        keys
    }

    /// Aggregate counts for reporting.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_nodes: self.arena.node_count(),
            total_edges: self.arena.edge_count(),
            ..GraphStats::default()
        };
        for node in self.arena.node_weights() {
            stats.unresolved_references += node.unresolved.len();
            stats.dynamic_references += node.dynamic_refs;
            stats.malformed_references += node.malformed_refs;
            if node.state == NodeState::Error {
                stats.error_nodes += 1;
            }
        }
        stats
    }

    /// Immutable view for linearization. Holding it borrows the graph
    /// shared, so no mutation can happen while the view is alive.
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot { graph: self }
    }
}

/// Read-only view of a quiesced graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphSnapshot<'a> {
    graph: &'a DependencyGraph,
}

impl<'a> GraphSnapshot<'a> {
    pub fn node_keys(&self) -> Vec<&'a NodeKey> {
        self.graph.node_keys()
    }

    pub fn node(&self, key: &NodeKey) -> Option<&'a Node> {
        self.graph.node(key)
    }

    pub fn dependencies_of(&self, key: &NodeKey) -> Vec<&'a NodeKey> {
        self.graph.dependencies_of(key)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn key(s: &str) -> NodeKey {
        PathBuf::from(s)
    }

    #[test]
    fn insert_is_idempotent() {
        let mut g = DependencyGraph::new();
        assert!(g.insert_node(key("/a.lua")));
        assert!(!g.insert_node(key("/a.lua")));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn add_edge_creates_missing_dependency() {
        let mut g = DependencyGraph::new();
        g.insert_node(key("/a.lua"));
        let created = g.add_edge(&key("/a.lua"), &key("/b.lua"));
        assert!(created);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node(&key("/b.lua")).map(|n| n.state), Some(NodeState::Discovered));
    }

    #[test]
    fn duplicate_edge_changes_nothing() {
        let mut g = DependencyGraph::new();
        g.add_edge(&key("/a.lua"), &key("/b.lua"));
        g.add_edge(&key("/a.lua"), &key("/b.lua"));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn self_loop_is_a_single_edge() {
        let mut g = DependencyGraph::new();
        g.add_edge(&key("/a.lua"), &key("/a.lua"));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.dependencies_of(&key("/a.lua")), vec![&key("/a.lua")]);
    }

    #[test]
    fn mark_error_keeps_node_and_edges() {
        let mut g = DependencyGraph::new();
        g.add_edge(&key("/a.lua"), &key("/b.lua"));
        g.mark_error(&key("/a.lua"), "permission denied");
        let node = g.node(&key("/a.lua")).unwrap();
        assert_eq!(node.state, NodeState::Error);
        assert_eq!(node.error.as_deref(), Some("permission denied"));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.stats().error_nodes, 1);
    }

    #[test]
    fn content_is_write_once() {
        let mut g = DependencyGraph::new();
        g.insert_node(key("/a.lua"));
        g.set_content(&key("/a.lua"), "first".to_string(), Some(1));
        g.set_content(&key("/a.lua"), "second".to_string(), Some(2));
        let node = g.node(&key("/a.lua")).unwrap();
        assert_eq!(node.content.as_deref(), Some("first"));
        assert_eq!(node.content_hash, Some(1));
    }

    #[test]
    fn finalize_flags_fully_unresolved_nodes() {
        let mut g = DependencyGraph::new();
        g.insert_node(key("/a.lua"));
        g.push_raw_reference(&key("/a.lua"), "missing.module");
        g.record_unresolved(&key("/a.lua"), "missing.module".to_string());
        g.finalize_node(&key("/a.lua"));
        assert_eq!(g.node(&key("/a.lua")).map(|n| n.state), Some(NodeState::Unresolved));

        let mut g = DependencyGraph::new();
        g.insert_node(key("/b.lua"));
        g.finalize_node(&key("/b.lua"));
        assert_eq!(g.node(&key("/b.lua")).map(|n| n.state), Some(NodeState::Resolved));
    }

    #[test]
    fn dependencies_are_sorted() {
        let mut g = DependencyGraph::new();
        g.add_edge(&key("/a.lua"), &key("/c.lua"));
        g.add_edge(&key("/a.lua"), &key("/b.lua"));
        assert_eq!(
            g.dependencies_of(&key("/a.lua")),
            vec![&key("/b.lua"), &key("/c.lua")]
        );
    }
}
