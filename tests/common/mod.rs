//! Common test utilities for bootstrap pipeline tests.
//!
//! - `ScriptedRunner`: CommandRunner that records invocations and replays canned output
//! - `RecordingSink`: BootstrapEventSink that keeps every event
//! - Fixtures: host context, Compose files, project directories

#![allow(dead_code)]

pub mod fixtures;
pub mod runner;

pub use fixtures::*;
pub use runner::*;
