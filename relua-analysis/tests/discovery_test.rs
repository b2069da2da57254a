//! Discovery driver tests over real directory fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use relua_analysis::discovery::{DiscoveryDriver, FsContentSource};
use relua_analysis::graph::{linearize, NodeState};
use relua_analysis::resolver::ModuleResolver;
use relua_core::errors::DiscoveryError;
use relua_core::events::{
    DiscoveryCompleteEvent, DiscoveryStartedEvent, EventDispatcher, FileDiscoveredEvent,
    ReluaEventHandler,
};
use relua_core::traits::cancellation::{Cancellable, CancellationToken};
use relua_core::traits::content_source::{ContentSource, ReadFailure};

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}

fn resolver_for(root: &Path) -> ModuleResolver {
    ModuleResolver::new(
        vec![root.to_path_buf()],
        vec![".lua.unluac".to_string(), ".lua".to_string()],
    )
}

/// Diamond fixture: a → {b, c}, b → d, c → d.
fn write_diamond(root: &Path) {
    write_file(
        &root.join("a.lua.unluac"),
        "local b = require('b')\nlocal c = require('c')\n",
    );
    write_file(&root.join("b.lua.unluac"), "local d = require('d')\n");
    write_file(&root.join("c.lua.unluac"), "local d = require('d')\n");
    write_file(&root.join("d.lua.unluac"), "return {}\n");
}

#[test]
fn diamond_discovers_all_reachable_nodes() {
    let dir = tempfile::TempDir::new().unwrap();
    write_diamond(dir.path());

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);

    let a = canonical(&dir.path().join("a.lua.unluac"));
    let d = canonical(&dir.path().join("d.lua.unluac"));
    assert_eq!(graph.node(&a).map(|n| n.state), Some(NodeState::Resolved));
    assert_eq!(graph.dependencies_of(&a).len(), 2);
    assert!(graph.dependencies_of(&d).is_empty());
}

#[test]
fn diamond_linearizes_dependencies_first() {
    let dir = tempfile::TempDir::new().unwrap();
    write_diamond(dir.path());

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    let lin = linearize(&graph.snapshot());
    let expected: Vec<PathBuf> = ["d", "b", "c", "a"]
        .iter()
        .map(|m| canonical(&dir.path().join(format!("{m}.lua.unluac"))))
        .collect();
    assert_eq!(lin.order, expected);
    assert!(lin.cycles.is_empty());
}

#[test]
fn missing_module_never_creates_a_node() {
    let dir = tempfile::TempDir::new().unwrap();
    write_file(
        &dir.path().join("a.lua.unluac"),
        "local m = require('missing.module')\n",
    );

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);

    let a = canonical(&dir.path().join("a.lua.unluac"));
    let node = graph.node(&a).unwrap();
    assert_eq!(node.unresolved, vec!["missing.module".to_string()]);
    assert_eq!(node.raw_references, vec!["missing.module".to_string()]);
    // Every reference failed to resolve, so the node settles as Unresolved.
    assert_eq!(node.state, NodeState::Unresolved);
    assert_eq!(graph.stats().unresolved_references, 1);
}

#[test]
fn mutual_requires_form_one_cycle_group() {
    let dir = tempfile::TempDir::new().unwrap();
    write_file(&dir.path().join("a.lua.unluac"), "require('b')\n");
    write_file(&dir.path().join("b.lua.unluac"), "require('a')\n");

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    let lin = linearize(&graph.snapshot());
    let a = canonical(&dir.path().join("a.lua.unluac"));
    let b = canonical(&dir.path().join("b.lua.unluac"));

    assert_eq!(lin.cycles.len(), 1);
    assert_eq!(lin.cycles[0].members, vec![a.clone(), b.clone()]);
    assert_eq!(lin.cycles[0].example_path, vec![a.clone(), b.clone(), a.clone()]);
    assert_eq!(lin.order, vec![a, b]);
}

#[test]
fn duplicate_requires_keep_raw_order_but_one_edge() {
    let dir = tempfile::TempDir::new().unwrap();
    write_file(
        &dir.path().join("a.lua.unluac"),
        "require('b')\nrequire('b')\n",
    );
    write_file(&dir.path().join("b.lua.unluac"), "return {}\n");

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    let a = canonical(&dir.path().join("a.lua.unluac"));
    assert_eq!(graph.node(&a).unwrap().raw_references.len(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn dynamic_reference_is_counted_not_resolved() {
    let dir = tempfile::TempDir::new().unwrap();
    write_file(
        &dir.path().join("a.lua.unluac"),
        "local name = compute()\nlocal m = require(name)\n",
    );

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    let a = canonical(&dir.path().join("a.lua.unluac"));
    let node = graph.node(&a).unwrap();
    assert_eq!(node.dynamic_refs, 1);
    assert!(node.raw_references.is_empty());
    assert_eq!(node.state, NodeState::Resolved);
    assert_eq!(graph.stats().dynamic_references, 1);
}

#[test]
fn nonexistent_root_aborts_the_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let err = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("nope.lua.unluac"))
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::RootUnreadable { .. }));
}

/// Source that fails reads for any file whose name contains a marker.
struct FailingSource {
    inner: FsContentSource,
    fail_marker: &'static str,
}

impl ContentSource for FailingSource {
    fn read(&self, path: &Path) -> Result<String, ReadFailure> {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        if name.is_some_and(|n| n.contains(self.fail_marker)) {
            return Err(ReadFailure::new(path, "simulated I/O failure"));
        }
        self.inner.read(path)
    }
}

#[test]
fn unreadable_root_via_source_aborts_the_run() {
    let dir = tempfile::TempDir::new().unwrap();
    write_file(&dir.path().join("bad.lua.unluac"), "return {}\n");

    let source = FailingSource {
        inner: FsContentSource::new(1_048_576),
        fail_marker: "bad",
    };
    let mut resolver = resolver_for(dir.path());
    let err = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("bad.lua.unluac"))
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::RootUnreadable { .. }));
}

#[test]
fn unreadable_dependency_is_node_local() {
    let dir = tempfile::TempDir::new().unwrap();
    write_file(
        &dir.path().join("a.lua.unluac"),
        "require('good')\nrequire('bad')\n",
    );
    write_file(&dir.path().join("good.lua.unluac"), "return {}\n");
    write_file(&dir.path().join("bad.lua.unluac"), "return {}\n");

    let source = FailingSource {
        inner: FsContentSource::new(1_048_576),
        fail_marker: "bad",
    };
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    let bad = canonical(&dir.path().join("bad.lua.unluac"));
    let good = canonical(&dir.path().join("good.lua.unluac"));
    let bad_node = graph.node(&bad).unwrap();
    assert_eq!(bad_node.state, NodeState::Error);
    assert!(bad_node.error.as_deref().unwrap().contains("simulated"));
    assert!(bad_node.content.is_none());
    assert_eq!(graph.node(&good).map(|n| n.state), Some(NodeState::Resolved));
    assert_eq!(graph.stats().error_nodes, 1);
    // The edge into the error node survives.
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn cancelled_token_aborts_before_any_wave() {
    let dir = tempfile::TempDir::new().unwrap();
    write_diamond(dir.path());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let err = DiscoveryDriver::new(&source, &mut resolver)
        .with_cancellation(&cancel)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::Cancelled));
}

#[test]
fn repeated_discovery_is_byte_identical() {
    let dir = tempfile::TempDir::new().unwrap();
    write_diamond(dir.path());
    // A cycle on the side, to exercise the cycle report too.
    write_file(&dir.path().join("e.lua.unluac"), "require('f')\n");
    write_file(&dir.path().join("f.lua.unluac"), "require('e')\n");
    write_file(
        &dir.path().join("a.lua.unluac"),
        "require('b')\nrequire('c')\nrequire('e')\n",
    );

    let run = || {
        let source = FsContentSource::new(1_048_576);
        let mut resolver = resolver_for(dir.path());
        let graph = DiscoveryDriver::new(&source, &mut resolver)
            .run(&dir.path().join("a.lua.unluac"))
            .unwrap();
        linearize(&graph.snapshot())
    };

    let first = run();
    let second = run();
    assert_eq!(first.order, second.order);
    assert_eq!(first.cycles, second.cycles);
}

/// Handler that counts discovery lifecycle events.
#[derive(Default)]
struct CountingHandler {
    started: AtomicUsize,
    discovered: AtomicUsize,
    complete: AtomicUsize,
}

impl ReluaEventHandler for CountingHandler {
    fn on_discovery_started(&self, _event: &DiscoveryStartedEvent) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    fn on_file_discovered(&self, _event: &FileDiscoveredEvent) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    fn on_discovery_complete(&self, _event: &DiscoveryCompleteEvent) {
        self.complete.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn lifecycle_events_cover_every_node() {
    let dir = tempfile::TempDir::new().unwrap();
    write_diamond(dir.path());

    let handler = Arc::new(CountingHandler::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(handler.clone());

    let source = FsContentSource::new(1_048_576);
    let mut resolver = resolver_for(dir.path());
    let graph = DiscoveryDriver::new(&source, &mut resolver)
        .with_events(&dispatcher)
        .run(&dir.path().join("a.lua.unluac"))
        .unwrap();

    assert_eq!(handler.started.load(Ordering::Relaxed), 1);
    assert_eq!(handler.complete.load(Ordering::Relaxed), 1);
    assert_eq!(
        handler.discovered.load(Ordering::Relaxed),
        graph.node_count()
    );
}
