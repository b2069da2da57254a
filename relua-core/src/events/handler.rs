//! Event handler trait with default no-op methods.

use super::types::*;

/// Observer for discovery and restoration lifecycle events.
///
/// All methods default to no-ops so handlers only implement what they
/// care about. Handlers must be `Send + Sync`; the dispatcher may be
/// shared across threads.
pub trait ReluaEventHandler: Send + Sync {
    fn on_discovery_started(&self, event: &DiscoveryStartedEvent) {
        let _ = event;
    }

    fn on_file_discovered(&self, event: &FileDiscoveredEvent) {
        let _ = event;
    }

    fn on_discovery_progress(&self, event: &DiscoveryProgressEvent) {
        let _ = event;
    }

    fn on_discovery_complete(&self, event: &DiscoveryCompleteEvent) {
        let _ = event;
    }

    fn on_cycle_detected(&self, event: &CycleDetectedEvent) {
        let _ = event;
    }

    fn on_restore_started(&self, event: &RestoreStartedEvent) {
        let _ = event;
    }

    fn on_restore_progress(&self, event: &RestoreProgressEvent) {
        let _ = event;
    }

    fn on_restore_complete(&self, event: &RestoreCompleteEvent) {
        let _ = event;
    }

    fn on_error(&self, event: &ErrorEvent) {
        let _ = event;
    }
}
