//! ui
//!
//! Presentation layer.
//!
//! Receives immutable result records from the analyzer and formats them for
//! people. Nothing in here is consulted by the core.

pub mod output;
pub mod render;

pub use output::Verbosity;
