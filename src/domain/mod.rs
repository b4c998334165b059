//! Domain Layer
//!
//! Bootstrap concepts without I/O dependencies.
//!
//! ## Structure
//!
//! - `value_objects/` - Profile, Datastore, OsRelease, ComposeProject
//! - `services/` - Tailscale output interpretation
//! - `ports/` - CommandRunner and BootstrapEventSink interfaces
//!
//! All process execution goes through the `CommandRunner` port.

pub mod ports;
pub mod services;
pub mod value_objects;
