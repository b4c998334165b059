//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod bootstrap_events;
pub mod command_runner;
pub mod host_facts;

pub use bootstrap_events::{BootstrapEvent, BootstrapEventSink, NoopEventSink};
pub use command_runner::{CommandOutput, CommandRunner, Invocation, TIMEOUT_EXIT_CODE};
pub use host_facts::HostFacts;
