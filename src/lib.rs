//! Indirector - host bootstrap and Companion automation tool
//!
//! `bootstrap` prepares a Linux host for the Companion stack: apt upgrade,
//! Docker Engine install, datastore provisioning, Compose recreation and the
//! Tailscale login handshake. `companion` connects to the Companion
//! WebSocket bridge and runs automations against it.

pub mod application;
pub mod companion;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{check_environment, BootstrapReport, BootstrapRequest, Bootstrapper, HostContext};
pub use companion::{Companion, CompanionSettings, Matcher};
pub use config::Config;
pub use domain::value_objects::Profile;
pub use error::{IndirectorError, IndirectorResult};
