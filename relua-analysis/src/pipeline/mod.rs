//! Restoration pipeline — discovery, linearization, and the ordered
//! hand-off to the external restoration collaborator.

pub mod plan;
pub mod restore;

use std::path::Path;

use relua_core::config::ReluaConfig;
use relua_core::errors::DiscoveryError;
use relua_core::events::EventDispatcher;
use relua_core::traits::cancellation::CancellationToken;

use crate::discovery::{DiscoveryDriver, FsContentSource};
use crate::graph::DependencyGraph;
use crate::resolver::ModuleResolver;

pub use plan::{PlanSummary, RestorationPlan, RestorationRecord};
pub use restore::{restore_in_order, RestoredFile, Restorer};

/// Run a full discovery pass from `root_file` using the configured search
/// roots and the local filesystem.
///
/// Convenience wiring for the common case; embedders with custom content
/// sources drive `DiscoveryDriver` directly.
pub fn discover(
    root_file: &Path,
    config: &ReluaConfig,
    resolver: &mut ModuleResolver,
    events: Option<&EventDispatcher>,
    cancel: Option<&CancellationToken>,
) -> Result<DependencyGraph, DiscoveryError> {
    if let Some(threads) = config.discovery.threads {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .ok();
        }
    }

    let source = FsContentSource::from_config(&config.discovery);
    let mut driver = DiscoveryDriver::new(&source, resolver)
        .with_hashing(config.discovery.effective_compute_hashes());
    if let Some(events) = events {
        driver = driver.with_events(events);
    }
    if let Some(cancel) = cancel {
        driver = driver.with_cancellation(cancel);
    }
    driver.run(root_file)
}
