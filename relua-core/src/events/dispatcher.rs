//! EventDispatcher — synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::ReluaEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec —
/// effectively zero cost. The compiler may optimize it away entirely.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ReluaEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ReluaEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn ReluaEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    // ---- Discovery lifecycle ----
    pub fn emit_discovery_started(&self, event: &DiscoveryStartedEvent) {
        self.emit(|h| h.on_discovery_started(event));
    }

    pub fn emit_file_discovered(&self, event: &FileDiscoveredEvent) {
        self.emit(|h| h.on_file_discovered(event));
    }

    pub fn emit_discovery_progress(&self, event: &DiscoveryProgressEvent) {
        self.emit(|h| h.on_discovery_progress(event));
    }

    pub fn emit_discovery_complete(&self, event: &DiscoveryCompleteEvent) {
        self.emit(|h| h.on_discovery_complete(event));
    }

    pub fn emit_cycle_detected(&self, event: &CycleDetectedEvent) {
        self.emit(|h| h.on_cycle_detected(event));
    }

    // ---- Restoration lifecycle ----
    pub fn emit_restore_started(&self, event: &RestoreStartedEvent) {
        self.emit(|h| h.on_restore_started(event));
    }

    pub fn emit_restore_progress(&self, event: &RestoreProgressEvent) {
        self.emit(|h| h.on_restore_progress(event));
    }

    pub fn emit_restore_complete(&self, event: &RestoreCompleteEvent) {
        self.emit(|h| h.on_restore_complete(event));
    }

    // ---- Errors ----
    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
