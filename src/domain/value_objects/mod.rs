//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod compose;
mod config_warning;
mod datastore;
mod os_release;
mod profile;

pub use compose::{ComposeProject, ComposeService, COMPOSE_FILE_NAMES};
pub use config_warning::ConfigWarning;
pub use datastore::{parse_mode, Datastore, Owner};
pub use os_release::OsRelease;
pub use profile::Profile;
