//! Configuration loading
//!
//! Builds the application [`Config`](zipcast_domain::Config) from an
//! optional TOML/JSON file plus `ZIPCAST_*` environment overrides.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths};
