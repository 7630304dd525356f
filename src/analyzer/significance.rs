//! analyzer::significance
//!
//! The significance filter.
//!
//! Merge commits inflate ahead/behind counts without representing new
//! content, so a relationship alone cannot say whether code actually
//! differs. Relative to the merge base, this filter counts non-merge
//! commits on each side and checks for a path-level diff between the two
//! tips; any of the three being non-zero makes the difference significant.
//!
//! Failure policy: if the merge base cannot be resolved, or any query under
//! it fails, the difference is reported as significant with an assumed file
//! diff. A false positive costs a needless look; a false negative hides
//! real divergence.

use crate::core::types::{Oid, SignificanceResult};
use crate::git::{Git, GitError};

/// Assess whether the difference between HEAD and `target` is significant.
///
/// Degraded results append an explanation to `warnings` so callers can tell
/// a measured verdict from an assumed one.
pub fn assess(git: &Git, target: &Oid, warnings: &mut Vec<String>) -> SignificanceResult {
    match try_assess(git, target) {
        Ok(Some(result)) => result,
        Ok(None) => {
            warnings.push(
                "no common ancestor between HEAD and target; treating the difference as significant"
                    .to_string(),
            );
            SignificanceResult::assumed_significant()
        }
        Err(e) => {
            warnings.push(format!(
                "significance check degraded ({e}); assuming a real code difference"
            ));
            SignificanceResult::assumed_significant()
        }
    }
}

/// `Ok(None)` means "no merge base" and maps to the safety default above.
fn try_assess(git: &Git, target: &Oid) -> Result<Option<SignificanceResult>, GitError> {
    let current = git.head_oid()?;

    let base = match git.merge_base(&current, target)? {
        Some(base) => base,
        None => return Ok(None),
    };

    let behind_meaningful = git.count_non_merge_commits(&base, target)?;
    let ahead_meaningful = git.count_non_merge_commits(&base, &current)?;
    let changed_paths = git.diff_paths(target, &current)?;

    Ok(Some(SignificanceResult::measured(
        ahead_meaningful,
        behind_meaningful,
        !changed_paths.is_empty(),
        base,
    )))
}
