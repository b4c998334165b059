//! Presentation Layer
//!
//! CLI argument parsing (via clap). Rendering lives in the binary's `ui`
//! module; the use cases live in `application` and `companion`.

pub mod cli;

pub use cli::{Cli, ColorWhen, Commands};
