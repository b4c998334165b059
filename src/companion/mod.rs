//! Companion automation client
//!
//! Talks to a Bitfocus Companion WebSocket bridge: variable cache and
//! change handlers, button handlers, actions, and editor snippets.

pub mod client;
pub mod matcher;
pub mod protocol;
mod registry;
pub mod snippets;
mod variables;

pub use client::{Companion, CompanionSettings, SnippetSettings};
pub use matcher::{parse_watch, Matcher, WatchSpec};
pub use protocol::{ButtonEvent, ButtonEventKind, ButtonLocation, VariableChange};
