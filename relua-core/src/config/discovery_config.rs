//! Discovery configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default extension priority: decompiler output first, plain source second.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".lua.unluac", ".lua"];

/// Configuration for the discovery subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Ordered search roots for module resolution. Earlier roots win.
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,
    /// Ordered file extensions probed per root. Default: `.lua.unluac`, `.lua`.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Maximum file size read during discovery, in bytes. Default: 1 MiB.
    pub max_file_size: Option<u64>,
    /// Worker threads for parallel reads. Default: rayon's global pool.
    pub threads: Option<usize>,
    /// Read timeout handed to the content source, in milliseconds. Default: 10000.
    pub read_timeout_ms: Option<u64>,
    /// Compute content hashes for restoration records. Default: true.
    pub compute_hashes: Option<bool>,
}

impl DiscoveryConfig {
    /// Returns the effective extension list, defaulting to the decompiler pair.
    pub fn effective_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
        } else {
            self.extensions.clone()
        }
    }

    /// Returns the effective maximum file size, defaulting to 1 MiB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }

    /// Returns the effective read timeout, defaulting to 10 seconds.
    pub fn effective_read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms.unwrap_or(10_000)
    }

    /// Returns whether content hashes are computed, defaulting to true.
    pub fn effective_compute_hashes(&self) -> bool {
        self.compute_hashes.unwrap_or(true)
    }
}
