//! Top-level relua configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DiscoveryConfig, RestoreConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Runtime overrides (applied via `apply_overrides`)
/// 2. Environment variables (`RELUA_*`)
/// 3. Project config (`relua.toml` in project root)
/// 4. User config (`~/.relua/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReluaConfig {
    pub discovery: DiscoveryConfig,
    pub restore: RestoreConfig,
}

/// Embedder-supplied overrides that can be applied on top of a config.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOverrides {
    pub search_roots: Option<Vec<std::path::PathBuf>>,
    pub extensions: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
    pub threads: Option<usize>,
}

impl ReluaConfig {
    /// Load configuration with layered resolution.
    ///
    /// Resolution order (highest priority first):
    /// 1. Runtime overrides
    /// 2. Environment variables (`RELUA_*`)
    /// 3. Project config (`relua.toml` in `root`)
    /// 4. User config (`~/.relua/config.toml`)
    /// 5. Compiled defaults
    pub fn load(
        root: &Path,
        overrides: Option<&RuntimeOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(_) => {
                        // Non-parse errors from user config are warnings, not fatal.
                        // Continue with defaults.
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("relua.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): runtime overrides
        if let Some(ov) = overrides {
            Self::apply_overrides(&mut config, ov);
        }

        // Validate the final config
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ReluaConfig) -> Result<(), ConfigError> {
        if let Some(max_file_size) = config.discovery.max_file_size {
            if max_file_size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "discovery.max_file_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        for ext in &config.discovery.extensions {
            if !ext.starts_with('.') {
                return Err(ConfigError::ValidationFailed {
                    field: "discovery.extensions".to_string(),
                    message: format!("extension {ext:?} must start with '.'"),
                });
            }
        }
        if let Some(timeout) = config.discovery.read_timeout_ms {
            if timeout == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "discovery.read_timeout_ms".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.relua/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(".relua").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ReluaConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| {
            ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
        })?;

        let file_config: ReluaConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` (or non-empty) value.
    fn merge(base: &mut ReluaConfig, other: &ReluaConfig) {
        // Discovery
        if !other.discovery.search_roots.is_empty() {
            base.discovery.search_roots = other.discovery.search_roots.clone();
        }
        if !other.discovery.extensions.is_empty() {
            base.discovery.extensions = other.discovery.extensions.clone();
        }
        if other.discovery.max_file_size.is_some() {
            base.discovery.max_file_size = other.discovery.max_file_size;
        }
        if other.discovery.threads.is_some() {
            base.discovery.threads = other.discovery.threads;
        }
        if other.discovery.read_timeout_ms.is_some() {
            base.discovery.read_timeout_ms = other.discovery.read_timeout_ms;
        }
        if other.discovery.compute_hashes.is_some() {
            base.discovery.compute_hashes = other.discovery.compute_hashes;
        }

        // Restore
        if other.restore.fallback_to_source.is_some() {
            base.restore.fallback_to_source = other.restore.fallback_to_source;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `RELUA_MAX_FILE_SIZE`, `RELUA_THREADS`, etc.
    fn apply_env_overrides(config: &mut ReluaConfig) {
        if let Ok(val) = std::env::var("RELUA_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.discovery.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("RELUA_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.discovery.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("RELUA_READ_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.discovery.read_timeout_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("RELUA_FALLBACK_TO_SOURCE") {
            if let Ok(v) = val.parse::<bool>() {
                config.restore.fallback_to_source = Some(v);
            }
        }
    }

    /// Apply runtime overrides (highest priority).
    fn apply_overrides(config: &mut ReluaConfig, ov: &RuntimeOverrides) {
        if let Some(ref roots) = ov.search_roots {
            config.discovery.search_roots = roots.clone();
        }
        if let Some(ref exts) = ov.extensions {
            config.discovery.extensions = exts.clone();
        }
        if let Some(v) = ov.max_file_size {
            config.discovery.max_file_size = Some(v);
        }
        if let Some(v) = ov.threads {
            config.discovery.threads = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
