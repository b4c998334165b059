//! Property tests for output parsing.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/tailscale_output.rs"]
mod tailscale_output;

#[path = "properties/watch_spec.rs"]
mod watch_spec;
