//! analyzer::validate
//!
//! Target reference resolution.
//!
//! The charset check lives on [`crate::core::types::BranchRef`] and runs
//! before any oracle query. This module handles the rest of validation:
//! optionally refreshing remote metadata, then trying resolution candidates
//! in a fixed order until one hits.

use crate::core::types::{BranchRef, Oid};
use crate::git::Git;

use super::AnalyzeError;

/// A reference that resolved to a commit.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// The display name of the candidate that won (e.g. `origin/main` when
    /// the bare local name did not exist).
    pub name: String,
    pub oid: Oid,
}

/// Resolve a validated target reference to a commit.
///
/// Candidates, in order (first successful resolution wins):
/// 1. local branch: `refs/heads/<name>`
/// 2. remote-qualified: `refs/remotes/<name>`
/// 3. `refs/remotes/origin/<name>` with any leading `origin/` stripped
///
/// If the reference contains a path separator (heuristic for "is a remote
/// ref") and `auto_refresh` is set, all remotes are fetched first. A fetch
/// failure only appends a warning; local resolution still proceeds.
///
/// # Errors
///
/// [`AnalyzeError::BranchNotFound`] when no candidate resolves.
pub fn resolve_target(
    git: &Git,
    target: &BranchRef,
    auto_refresh: bool,
    warnings: &mut Vec<String>,
) -> Result<ResolvedTarget, AnalyzeError> {
    if auto_refresh && target.is_remote_like() {
        if let Err(e) = git.fetch_all_remotes() {
            warnings.push(format!(
                "remote refresh failed ({e}); resolving against local refs only"
            ));
        }
    }

    let stripped = target.without_origin_prefix();
    let candidates = [
        (
            target.as_str().to_string(),
            format!("refs/heads/{}", target.as_str()),
        ),
        (
            target.as_str().to_string(),
            format!("refs/remotes/{}", target.as_str()),
        ),
        (
            format!("origin/{stripped}"),
            format!("refs/remotes/origin/{stripped}"),
        ),
    ];

    for (name, refname) in candidates {
        if let Ok(Some(oid)) = git.try_resolve_ref(&refname) {
            return Ok(ResolvedTarget { name, oid });
        }
    }

    Err(AnalyzeError::BranchNotFound(target.to_string()))
}
