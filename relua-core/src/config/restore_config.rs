//! Restoration configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the restoration pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RestoreConfig {
    /// Fall back to the original content when the collaborator fails a record.
    /// Default: true.
    pub fallback_to_source: Option<bool>,
}

impl RestoreConfig {
    /// Returns whether failed records fall back to source, defaulting to true.
    pub fn effective_fallback_to_source(&self) -> bool {
        self.fallback_to_source.unwrap_or(true)
    }
}
