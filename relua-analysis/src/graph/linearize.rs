//! Cycle detection and deterministic linearization.
//!
//! One Tarjan pass computes strongly connected components; Kahn's
//! algorithm over the condensation graph emits dependencies before
//! dependents. Every choice point is tie-broken lexicographically by
//! canonical key (a cycle group is keyed by its smallest member), so an
//! identical graph always yields a byte-identical order regardless of how
//! discovery happened to insert nodes and edges.
//!
//! Within a cycle group no true dependency order exists; members are
//! emitted in lexicographic key order. That is a documented approximation,
//! not a correctness guarantee.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::Serialize;

use relua_core::types::collections::{FxHashMap, FxHashSet};

use super::dependency_graph::GraphSnapshot;
use super::types::NodeKey;

/// A detected cycle group: members sorted lexicographically, plus one
/// concrete path demonstrating the cycle. The path starts and ends at the
/// smallest member (`[a, b, a]` for a 2-cycle, `[a, a]` for a self-loop).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleGroup {
    pub members: Vec<NodeKey>,
    pub example_path: Vec<NodeKey>,
}

/// The deterministic processing order plus the cycle report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Linearization {
    /// Node keys such that for every edge (dependent, dependency) with
    /// endpoints in distinct components, the dependency comes first.
    pub order: Vec<NodeKey>,
    /// Cycle groups, ordered by their smallest member key.
    pub cycles: Vec<CycleGroup>,
}

/// Linearize a quiesced graph.
pub fn linearize(snapshot: &GraphSnapshot<'_>) -> Linearization {
    // Rank nodes lexicographically up front: from here on, id order IS
    // key order, which makes every later tie-break a plain integer min.
    let keys: Vec<&NodeKey> = snapshot.node_keys();
    let n = keys.len();
    let mut id_of: FxHashMap<&NodeKey, usize> = FxHashMap::default();
    for (i, key) in keys.iter().enumerate() {
        id_of.insert(*key, i);
    }

    let adj: Vec<Vec<usize>> = keys
        .iter()
        .map(|&key| {
            snapshot
                .dependencies_of(key)
                .into_iter()
                .filter_map(|dep| id_of.get(dep).copied())
                .collect()
        })
        .collect();

    let (comps, comp_of) = tarjan_scc(n, &adj);

    let mut cycles = Vec::new();
    for (comp_id, comp) in comps.iter().enumerate() {
        let is_cycle = comp.len() > 1 || adj[comp[0]].contains(&comp[0]);
        if is_cycle {
            cycles.push(CycleGroup {
                members: comp.iter().map(|&i| keys[i].clone()).collect(),
                example_path: example_cycle_path(&adj, &comp_of, comp_id, comp[0])
                    .into_iter()
                    .map(|i| keys[i].clone())
                    .collect(),
            });
        }
    }
    cycles.sort_by(|a, b| a.members[0].cmp(&b.members[0]));

    // Condensation: indegree counts unemitted dependency components.
    let c = comps.len();
    let mut indegree = vec![0usize; c];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); c];
    let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
    for v in 0..n {
        for &w in &adj[v] {
            let (cv, cw) = (comp_of[v], comp_of[w]);
            if cv != cw && seen.insert((cv, cw)) {
                indegree[cv] += 1;
                dependents[cw].push(cv);
            }
        }
    }

    let mut heap: BinaryHeap<Reverse<(usize, usize)>> = BinaryHeap::new();
    for comp_id in 0..c {
        if indegree[comp_id] == 0 {
            heap.push(Reverse((comps[comp_id][0], comp_id)));
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse((_, comp_id))) = heap.pop() {
        for &i in &comps[comp_id] {
            order.push(keys[i].clone());
        }
        for &dep in &dependents[comp_id] {
            indegree[dep] -= 1;
            if indegree[dep] == 0 {
                heap.push(Reverse((comps[dep][0], dep)));
            }
        }
    }

    Linearization { order, cycles }
}

/// Iterative Tarjan. Returns the components (members sorted ascending,
/// which is lexicographic by construction) and the component id per node.
fn tarjan_scc(n: usize, adj: &[Vec<usize>]) -> (Vec<Vec<usize>>, Vec<usize>) {
    const UNVISITED: usize = usize::MAX;

    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut comp_of = vec![0usize; n];
    let mut comps: Vec<Vec<usize>> = Vec::new();
    let mut next_index = 0usize;

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }
        // Explicit call stack of (node, next neighbor position).
        let mut work: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(&(v, pos)) = work.last() {
            if pos == 0 {
                index[v] = next_index;
                lowlink[v] = next_index;
                next_index += 1;
                stack.push(v);
                on_stack[v] = true;
            }
            if pos < adj[v].len() {
                if let Some(frame) = work.last_mut() {
                    frame.1 += 1;
                }
                let w = adj[v][pos];
                if index[w] == UNVISITED {
                    work.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
            } else {
                work.pop();
                if let Some(&(parent, _)) = work.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }
                if lowlink[v] == index[v] {
                    let mut comp = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        comp_of[w] = comps.len();
                        comp.push(w);
                        if w == v {
                            break;
                        }
                    }
                    comp.sort_unstable();
                    comps.push(comp);
                }
            }
        }
    }

    (comps, comp_of)
}

/// Find a concrete cycle through `start` inside its component: DFS over
/// component-internal edges until an edge back to `start` appears. One
/// always exists — `start` has an in-edge from some component member, and
/// every member is reachable from `start` within the component.
fn example_cycle_path(
    adj: &[Vec<usize>],
    comp_of: &[usize],
    comp_id: usize,
    start: usize,
) -> Vec<usize> {
    let mut path = vec![start];
    let mut cursors = vec![0usize];
    let mut visited = FxHashSet::default();
    visited.insert(start);

    while let Some(&v) = path.last() {
        let pos = match cursors.last_mut() {
            Some(p) => p,
            None => break,
        };
        if *pos < adj[v].len() {
            let w = adj[v][*pos];
            *pos += 1;
            if comp_of[w] != comp_id {
                continue;
            }
            if w == start {
                path.push(start);
                return path;
            }
            if visited.insert(w) {
                path.push(w);
                cursors.push(0);
            }
        } else {
            path.pop();
            cursors.pop();
        }
    }

    // Unreachable for a genuine cycle group; return a degenerate loop
    // rather than panicking.
    vec![start, start]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use std::path::PathBuf;

    fn key(s: &str) -> NodeKey {
        PathBuf::from(s)
    }

    /// Build a graph from (dependent, dependencies) pairs.
    fn build_graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for (from, deps) in edges {
            g.insert_node(key(from));
            for dep in *deps {
                g.add_edge(&key(from), &key(dep));
            }
        }
        g
    }

    #[test]
    fn empty_graph_empty_order() {
        let g = DependencyGraph::new();
        let lin = linearize(&g.snapshot());
        assert!(lin.order.is_empty());
        assert!(lin.cycles.is_empty());
    }

    #[test]
    fn single_node_no_cycle() {
        let g = build_graph(&[("/a.lua", &[])]);
        let lin = linearize(&g.snapshot());
        assert_eq!(lin.order, vec![key("/a.lua")]);
        assert!(lin.cycles.is_empty());
    }

    #[test]
    fn diamond_emits_dependencies_first() {
        // a → b, a → c, b → d, c → d
        let g = build_graph(&[
            ("/a.lua", &["/b.lua", "/c.lua"]),
            ("/b.lua", &["/d.lua"]),
            ("/c.lua", &["/d.lua"]),
            ("/d.lua", &[]),
        ]);
        let lin = linearize(&g.snapshot());
        assert_eq!(
            lin.order,
            vec![key("/d.lua"), key("/b.lua"), key("/c.lua"), key("/a.lua")]
        );
        assert!(lin.cycles.is_empty());
    }

    #[test]
    fn two_node_cycle_reported_with_path() {
        let g = build_graph(&[("/a.lua", &["/b.lua"]), ("/b.lua", &["/a.lua"])]);
        let lin = linearize(&g.snapshot());
        assert_eq!(lin.cycles.len(), 1);
        let cycle = &lin.cycles[0];
        assert_eq!(cycle.members, vec![key("/a.lua"), key("/b.lua")]);
        assert_eq!(
            cycle.example_path,
            vec![key("/a.lua"), key("/b.lua"), key("/a.lua")]
        );
        // Both nodes still appear in the order, lexicographically.
        assert_eq!(lin.order, vec![key("/a.lua"), key("/b.lua")]);
    }

    #[test]
    fn self_loop_is_a_cycle_group() {
        let g = build_graph(&[("/a.lua", &["/a.lua"])]);
        let lin = linearize(&g.snapshot());
        assert_eq!(lin.cycles.len(), 1);
        assert_eq!(lin.cycles[0].members, vec![key("/a.lua")]);
        assert_eq!(lin.cycles[0].example_path, vec![key("/a.lua"), key("/a.lua")]);
        assert_eq!(lin.order, vec![key("/a.lua")]);
    }

    #[test]
    fn cycle_group_ordered_against_outside_dependencies() {
        // a ↔ b, both depend on lib; lib first, then the group.
        let g = build_graph(&[
            ("/a.lua", &["/b.lua", "/lib.lua"]),
            ("/b.lua", &["/a.lua"]),
            ("/lib.lua", &[]),
        ]);
        let lin = linearize(&g.snapshot());
        assert_eq!(
            lin.order,
            vec![key("/lib.lua"), key("/a.lua"), key("/b.lua")]
        );
        assert_eq!(lin.cycles.len(), 1);
    }

    #[test]
    fn simultaneous_eligibility_breaks_ties_lexicographically() {
        // Independent roots: z, m, a — no edges.
        let g = build_graph(&[("/z.lua", &[]), ("/m.lua", &[]), ("/a.lua", &[])]);
        let lin = linearize(&g.snapshot());
        assert_eq!(
            lin.order,
            vec![key("/a.lua"), key("/m.lua"), key("/z.lua")]
        );
    }

    #[test]
    fn three_node_cycle_path_returns_to_start() {
        let g = build_graph(&[
            ("/a.lua", &["/b.lua"]),
            ("/b.lua", &["/c.lua"]),
            ("/c.lua", &["/a.lua"]),
        ]);
        let lin = linearize(&g.snapshot());
        assert_eq!(lin.cycles.len(), 1);
        let path = &lin.cycles[0].example_path;
        assert_eq!(path.first(), Some(&key("/a.lua")));
        assert_eq!(path.last(), Some(&key("/a.lua")));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn insertion_order_does_not_change_output() {
        let forward = build_graph(&[
            ("/a.lua", &["/b.lua", "/c.lua"]),
            ("/b.lua", &["/d.lua"]),
            ("/c.lua", &["/d.lua"]),
        ]);
        let reversed = build_graph(&[
            ("/c.lua", &["/d.lua"]),
            ("/b.lua", &["/d.lua"]),
            ("/a.lua", &["/c.lua", "/b.lua"]),
        ]);
        let lin_a = linearize(&forward.snapshot());
        let lin_b = linearize(&reversed.snapshot());
        assert_eq!(lin_a.order, lin_b.order);
        assert_eq!(lin_a.cycles, lin_b.cycles);
    }
}
