//! Configuration module for Indirector
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (INDIRECTOR_*)
//! 3. Explicit `--config` file, else project `indirector.toml`
//! 4. User config (~/.config/indirector/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;
pub use loader::{resolve, LoadedConfig, PROJECT_CONFIG_FILE};
pub use types::{
    BootstrapConfig, ColorMode, CompanionConfig, Config, DatastoreConfig, OutputConfig,
    TailscaleConfig,
};
