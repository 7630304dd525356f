//! analyzer::classify
//!
//! The relationship classifier.
//!
//! Determines the qualitative relationship between HEAD and the target
//! commit from reachability sets and, when those are inconclusive, the
//! merge base. Rules are ordered; the first match wins. Any oracle failure
//! anywhere degrades the verdict to Unknown/Low - the classifier never
//! raises.

use crate::core::types::{Confidence, Oid, Relationship, RelationshipResult};
use crate::git::{Git, GitError};

/// Classify the relationship between HEAD and `target`.
pub fn classify(git: &Git, target: &Oid) -> RelationshipResult {
    try_classify(git, target).unwrap_or_else(|_| RelationshipResult::unknown())
}

fn try_classify(git: &Git, target: &Oid) -> Result<RelationshipResult, GitError> {
    let current = git.head_oid()?;

    // Same commit: nothing else can change the answer.
    if current == *target {
        return Ok(high(Relationship::Synchronized));
    }

    let target_only = git.commits_only_in(target, &current)?;
    let current_only = git.commits_only_in(&current, target)?;

    // Everything the target has is already contained in HEAD.
    if target_only.is_empty() && !current_only.is_empty() {
        return Ok(high(Relationship::Ahead));
    }
    if target_only.is_empty() && current_only.is_empty() {
        return Ok(high(Relationship::Synchronized));
    }

    let base = git.merge_base(&current, target)?;
    Ok(resolve_with_base(
        &current,
        target,
        base.as_ref(),
        !target_only.is_empty(),
        !current_only.is_empty(),
    ))
}

/// The merge-base stage of the rule chain, split out so it can be exercised
/// without a repository.
fn resolve_with_base(
    current: &Oid,
    target: &Oid,
    base: Option<&Oid>,
    has_target_only: bool,
    has_current_only: bool,
) -> RelationshipResult {
    if let Some(base) = base {
        if base == current {
            return high(Relationship::Behind);
        }
        if base == target {
            return high(Relationship::Ahead);
        }
    }

    if has_target_only && has_current_only {
        high(Relationship::Diverged)
    } else if has_target_only {
        high(Relationship::Behind)
    } else if has_current_only {
        high(Relationship::Ahead)
    } else {
        // Unreachable given the emptiness rules above, but the ordered rule
        // chain is kept complete.
        RelationshipResult::new(Relationship::Synchronized, Confidence::Medium)
    }
}

fn high(relationship: Relationship) -> RelationshipResult {
    RelationshipResult::new(relationship, Confidence::High)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(seed: char) -> Oid {
        Oid::new(seed.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn base_equal_to_current_is_behind() {
        let current = oid('a');
        let target = oid('b');
        let result = resolve_with_base(&current, &target, Some(&current), true, false);
        assert_eq!(result.relationship, Relationship::Behind);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn base_equal_to_target_is_ahead() {
        let current = oid('a');
        let target = oid('b');
        let result = resolve_with_base(&current, &target, Some(&target), false, true);
        assert_eq!(result.relationship, Relationship::Ahead);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn both_sides_unique_is_diverged() {
        let current = oid('a');
        let target = oid('b');
        let base = oid('c');
        let result = resolve_with_base(&current, &target, Some(&base), true, true);
        assert_eq!(result.relationship, Relationship::Diverged);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn no_base_with_both_sides_unique_is_diverged() {
        let current = oid('a');
        let target = oid('b');
        let result = resolve_with_base(&current, &target, None, true, true);
        assert_eq!(result.relationship, Relationship::Diverged);
    }

    #[test]
    fn only_target_side_is_behind() {
        let current = oid('a');
        let target = oid('b');
        let base = oid('c');
        let result = resolve_with_base(&current, &target, Some(&base), true, false);
        assert_eq!(result.relationship, Relationship::Behind);
    }

    #[test]
    fn only_current_side_is_ahead() {
        let current = oid('a');
        let target = oid('b');
        let base = oid('c');
        let result = resolve_with_base(&current, &target, Some(&base), false, true);
        assert_eq!(result.relationship, Relationship::Ahead);
    }

    #[test]
    fn fall_through_is_synchronized_medium() {
        let current = oid('a');
        let target = oid('b');
        let base = oid('c');
        let result = resolve_with_base(&current, &target, Some(&base), false, false);
        assert_eq!(result.relationship, Relationship::Synchronized);
        assert_eq!(result.confidence, Confidence::Medium);
    }
}
