//! Restoration plan — the ordered output handed to the collaborator.

use serde::Serialize;

use relua_core::events::{CycleDetectedEvent, EventDispatcher};

use crate::graph::{linearize, CycleGroup, DependencyGraph, NodeKey, NodeState};
use crate::resolver::ModuleResolver;

/// One file ready for restoration, with everything the collaborator needs:
/// the content, its resolved dependencies, and their module names.
#[derive(Debug, Clone, Serialize)]
pub struct RestorationRecord {
    pub key: NodeKey,
    pub module_name: String,
    pub content: String,
    pub content_hash: Option<u64>,
    pub dependency_keys: Vec<NodeKey>,
    pub dependency_modules: Vec<String>,
}

/// Aggregate counts for the reporting collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub total_nodes: usize,
    pub records: usize,
    pub unresolved_references: usize,
    pub dynamic_references: usize,
    pub read_errors: usize,
    pub cycle_groups: usize,
}

/// The full ordered plan: records in processing order plus the cycle
/// report. `Error` nodes carry no content and are excluded from the
/// records, but still show up in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct RestorationPlan {
    pub records: Vec<RestorationRecord>,
    pub cycles: Vec<CycleGroup>,
    pub summary: PlanSummary,
}

impl RestorationPlan {
    /// Build the plan from a quiesced graph.
    ///
    /// Takes the graph by shared reference: discovery has returned, the
    /// snapshot freezes it, and linearization runs with no mutation
    /// possible.
    pub fn build(
        graph: &DependencyGraph,
        resolver: &ModuleResolver,
        events: Option<&EventDispatcher>,
    ) -> Self {
        let snapshot = graph.snapshot();
        let linearization = linearize(&snapshot);

        for cycle in &linearization.cycles {
            tracing::warn!(
                members = cycle.members.len(),
                first = %cycle.members[0].display(),
                "dependency cycle detected"
            );
            if let Some(events) = events {
                events.emit_cycle_detected(&CycleDetectedEvent {
                    members: cycle.members.clone(),
                });
            }
        }

        let mut records = Vec::new();
        for key in &linearization.order {
            let Some(node) = snapshot.node(key) else {
                continue;
            };
            if node.state == NodeState::Error {
                continue;
            }
            let Some(content) = node.content.clone() else {
                continue;
            };
            let dependency_keys: Vec<NodeKey> = snapshot
                .dependencies_of(key)
                .into_iter()
                .cloned()
                .collect();
            let dependency_modules = dependency_keys
                .iter()
                .map(|dep| resolver.module_name_for(dep))
                .collect();
            records.push(RestorationRecord {
                key: key.clone(),
                module_name: resolver.module_name_for(key),
                content,
                content_hash: node.content_hash,
                dependency_keys,
                dependency_modules,
            });
        }

        let stats = snapshot.stats();
        let summary = PlanSummary {
            total_nodes: stats.total_nodes,
            records: records.len(),
            unresolved_references: stats.unresolved_references,
            dynamic_references: stats.dynamic_references,
            read_errors: stats.error_nodes,
            cycle_groups: linearization.cycles.len(),
        };

        Self {
            records,
            cycles: linearization.cycles,
            summary,
        }
    }

    /// Serialize the plan for downstream consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
