//! Discovery driver — expands the dependency graph from a root file.
//!
//! Per-node state machine: `Discovered → Reading → (Resolved | Error)`.
//! A FIFO worklist is drained in waves: every node in the current wave is
//! read and its references extracted in parallel (reads for different
//! nodes are mutually independent), then the results are applied to the
//! graph serially in wave order. The driver thread is the only writer —
//! rayon workers return values and never touch the graph — so two workers
//! surfacing the same identifier still produce exactly one node.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use relua_core::errors::{error_code, DiscoveryError};
use relua_core::events::{
    DiscoveryCompleteEvent, DiscoveryProgressEvent, DiscoveryStartedEvent, ErrorEvent,
    EventDispatcher, FileDiscoveredEvent,
};
use relua_core::traits::cancellation::{Cancellable, CancellationToken};
use relua_core::traits::content_source::{ContentSource, ReadFailure};

use crate::extract::{extract_references, ExtractedRef};
use crate::graph::{DependencyGraph, NodeKey, NodeState};
use crate::hasher::hash_content;
use crate::resolver::{ModuleResolver, Resolution};

/// Drives discovery over a content source, a resolver, and a graph.
///
/// The resolver and graph are owned by the caller for the duration of one
/// run; their caches live and die with it.
pub struct DiscoveryDriver<'a> {
    source: &'a dyn ContentSource,
    resolver: &'a mut ModuleResolver,
    events: Option<&'a EventDispatcher>,
    cancel: Option<&'a CancellationToken>,
    compute_hashes: bool,
}

/// What one wave's parallel phase produced for a single node.
type WaveResult = (NodeKey, Result<(String, Vec<ExtractedRef>), ReadFailure>);

impl<'a> DiscoveryDriver<'a> {
    pub fn new(source: &'a dyn ContentSource, resolver: &'a mut ModuleResolver) -> Self {
        Self {
            source,
            resolver,
            events: None,
            cancel: None,
            compute_hashes: true,
        }
    }

    /// Report lifecycle events to the given dispatcher.
    pub fn with_events(mut self, events: &'a EventDispatcher) -> Self {
        self.events = Some(events);
        self
    }

    /// Honor the given cancellation token between waves.
    pub fn with_cancellation(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Enable or disable content hashing.
    pub fn with_hashing(mut self, compute_hashes: bool) -> Self {
        self.compute_hashes = compute_hashes;
        self
    }

    /// Run discovery from `root_file` until no new reachable node remains.
    ///
    /// Each node is read at most once; runtime is bounded by the number of
    /// distinct reachable files. Only a root-file read failure is fatal.
    /// On cancellation the partially-built graph is dropped with the
    /// returned error.
    pub fn run(mut self, root_file: &Path) -> Result<DependencyGraph, DiscoveryError> {
        let start = Instant::now();
        let root_key: NodeKey = std::fs::canonicalize(root_file).map_err(|e| {
            DiscoveryError::RootUnreadable {
                path: root_file.display().to_string(),
                message: e.to_string(),
            }
        })?;

        tracing::info!(root = %root_key.display(), "starting discovery");
        if let Some(events) = self.events {
            events.emit_discovery_started(&DiscoveryStartedEvent {
                root: root_key.clone(),
            });
            events.emit_file_discovered(&FileDiscoveredEvent {
                path: root_key.clone(),
                identifier: None,
            });
        }

        let mut graph = DependencyGraph::new();
        graph.insert_node(root_key.clone());

        let mut queue: VecDeque<NodeKey> = VecDeque::new();
        queue.push_back(root_key.clone());
        let mut processed = 0usize;

        while !queue.is_empty() {
            if self.cancel.is_some_and(|c| c.is_cancelled()) {
                tracing::info!(processed, "discovery cancelled; dropping partial graph");
                return Err(DiscoveryError::Cancelled);
            }

            // Parallel phase: read + extract, no graph access.
            let wave: Vec<NodeKey> = queue.drain(..).collect();
            for key in &wave {
                graph.set_state(key, NodeState::Reading);
            }
            let results: Vec<WaveResult> = wave
                .par_iter()
                .map(|key| {
                    let outcome = self.source.read(key).map(|content| {
                        let refs = extract_references(&content);
                        (content, refs)
                    });
                    (key.clone(), outcome)
                })
                .collect();

            // Serial phase: apply to the graph in wave order.
            for (key, outcome) in results {
                match outcome {
                    Err(failure) => {
                        if key == root_key {
                            return Err(DiscoveryError::RootUnreadable {
                                path: failure.path.display().to_string(),
                                message: failure.message,
                            });
                        }
                        tracing::warn!(path = %key.display(), error = %failure.message, "read failed; node marked as error");
                        if let Some(events) = self.events {
                            events.emit_error(&ErrorEvent {
                                message: failure.to_string(),
                                error_code: error_code::DISCOVERY_ERROR.to_string(),
                            });
                        }
                        graph.mark_error(&key, failure.message);
                    }
                    Ok((content, refs)) => {
                        let hash = self
                            .compute_hashes
                            .then(|| hash_content(content.as_bytes()));
                        graph.set_content(&key, content, hash);
                        self.apply_references(&mut graph, &mut queue, &key, refs);
                        graph.finalize_node(&key);
                    }
                }
                processed += 1;
            }

            if let Some(events) = self.events {
                events.emit_discovery_progress(&DiscoveryProgressEvent {
                    processed,
                    pending: queue.len(),
                });
            }
        }

        let stats = graph.stats();
        tracing::info!(
            nodes = stats.total_nodes,
            edges = stats.total_edges,
            unresolved = stats.unresolved_references,
            errors = stats.error_nodes,
            "discovery complete"
        );
        if let Some(events) = self.events {
            events.emit_discovery_complete(&DiscoveryCompleteEvent {
                total_nodes: stats.total_nodes,
                unresolved_references: stats.unresolved_references,
                read_errors: stats.error_nodes,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }
        Ok(graph)
    }

    /// Resolve one node's extracted references and grow the graph.
    fn apply_references(
        &mut self,
        graph: &mut DependencyGraph,
        queue: &mut VecDeque<NodeKey>,
        key: &NodeKey,
        refs: Vec<ExtractedRef>,
    ) {
        for reference in refs {
            match reference {
                ExtractedRef::Identifier(identifier) => {
                    graph.push_raw_reference(key, &identifier);
                    match self.resolver.resolve(&identifier) {
                        Resolution::Found(dep_key) => {
                            let newly_created = graph.add_edge(key, &dep_key);
                            if newly_created {
                                queue.push_back(dep_key.clone());
                                if let Some(events) = self.events {
                                    events.emit_file_discovered(&FileDiscoveredEvent {
                                        path: dep_key,
                                        identifier: Some(identifier),
                                    });
                                }
                            }
                        }
                        Resolution::Unresolved => {
                            tracing::debug!(
                                path = %key.display(),
                                identifier = %identifier,
                                "reference matched no file"
                            );
                            graph.record_unresolved(key, identifier);
                        }
                    }
                }
                ExtractedRef::Dynamic => graph.record_dynamic(key),
                ExtractedRef::Malformed => graph.record_malformed(key),
            }
        }
    }
}
