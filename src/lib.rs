//! Smoothie Assistant Library
//!
//! Native entry points for the smoothie chat widget: the headless chat
//! runner and its NDJSON event format.

pub mod headless;

// Re-export main entry points
pub use headless::runner::{run_headless_chat, ChatOptions};
