//! Configuration system for relua.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod discovery_config;
pub mod relua_config;
pub mod restore_config;

pub use discovery_config::DiscoveryConfig;
pub use relua_config::{ReluaConfig, RuntimeOverrides};
pub use restore_config::RestoreConfig;
