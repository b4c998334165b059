//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//!
//! - `process` - CommandRunner over `std::process`
//! - `host` - HostFacts over the environment, `PATH` and `/proc`

pub mod host;
pub mod process;

pub use host::{SystemHost, OS_RELEASE_PATH};
pub use process::SystemRunner;
