//! Terminal presentation for the indirector binary
//!
//! Everything here renders; nothing here decides.

pub mod blocks;
pub mod context;
pub mod error;
pub mod json;
pub mod primitives;
pub mod sink;
pub mod terminal;
pub mod theme;
pub mod views;
pub mod widgets;
