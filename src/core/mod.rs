//! core
//!
//! Domain types and configuration for the branch relationship analyzer.
//!
//! The core holds no persisted state: every type here is either a validated
//! input ([`types::BranchRef`], [`types::Oid`]) or an immutable result record
//! derived from read-only repository queries.

pub mod config;
pub mod types;
