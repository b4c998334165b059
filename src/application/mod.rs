//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (value objects, services, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Bootstrapper` - guard, apt, Docker, deploy and Tailscale login

pub mod bootstrap;

pub use bootstrap::{
    check_environment, BootstrapReport, BootstrapRequest, Bootstrapper, HostContext,
};
