//! drift - does that branch actually differ, or is it just merge noise?
//!
//! drift compares the current branch against a target reference and reports
//! whether their code content really differs, filtering out history-only
//! differences created by merge commits.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates)
//! - [`analyzer`] - Validation, relationship classifier, significance
//!   filter, merge-flow heuristic, report assembly
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Presentation layer (renders immutable reports)
//!
//! # Correctness invariants
//!
//! 1. Target references are validated before any repository query
//! 2. Every repository access is read-only and flows through [`git::Git`]
//! 3. Only validation errors are fatal; query failures degrade to
//!    conservative defaults (never under-reporting a code difference)
//! 4. The merge-flow heuristic is advisory and never influences the
//!    relationship or significance verdicts

pub mod analyzer;
pub mod cli;
pub mod core;
pub mod git;
pub mod ui;
