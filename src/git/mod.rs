//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. All repository queries flow
//! through [`Git`]; no other module imports `git2`. The analyzer treats the
//! repository as an opaque oracle reachable only through this fixed,
//! read-only query set (plus one best-effort fetch).
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Ref resolution (fully-qualified names)
//! - Ancestry queries (merge-base, reachability walks, non-merge counts)
//! - Tree-level diff path listing
//! - Merge-history scanning and commit metadata
//! - Working-tree status
//! - Remote metadata refresh (best-effort)

mod interface;

pub use interface::{CommitSummary, Git, GitError, MergeCommit};
