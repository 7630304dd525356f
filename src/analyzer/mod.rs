//! analyzer
//!
//! The branch relationship analyzer: validation, classification,
//! significance filtering, and the advisory merge-flow heuristic, assembled
//! into a single immutable [`AnalysisReport`].
//!
//! # Control flow
//!
//! Validation -> Classifier -> Significance Filter (+ Merge-Flow Heuristic,
//! independent) -> presentation. No stage depends on the output of a later
//! stage, and every oracle query is read-only, so a run holds no state and
//! two runs over an unchanged repository produce identical reports.
//!
//! # Error policy
//!
//! Only validation errors are fatal ([`AnalyzeError`]). Everything after
//! validation catches oracle failures at the point of use and degrades:
//! the classifier to Unknown/Low, the significance filter to its
//! significant-by-default verdict, the history scan to empty. Degradations
//! that can mislead a caller are recorded as warnings on the report.

pub mod classify;
pub mod flow;
pub mod significance;
pub mod validate;

use std::path::Path;

use thiserror::Error;

use crate::core::types::{
    AnalysisReport, BasicStats, BranchRef, BranchSummary, Oid, WorkingAreaStatus,
};
use crate::git::{Git, GitError};

pub use validate::ResolvedTarget;

/// Fatal analysis errors. Everything else degrades into the report.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The target string failed the charset check (no oracle query ran).
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The working directory is not inside a (non-bare) repository.
    #[error("not a git repository (or any parent directory)")]
    NotARepository,

    /// No resolution candidate produced a commit.
    #[error("branch '{0}' not found (tried local, remote-qualified, and origin/ forms)")]
    BranchNotFound(String),

    /// Unexpected repository-level failure while opening.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Knobs the CLI layer resolves from config and flags.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Refresh remote metadata before resolving remote-looking refs.
    pub auto_refresh: bool,
    /// How many recent merge commits the flow heuristic scans.
    pub merge_scan_limit: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            merge_scan_limit: 10,
        }
    }
}

/// Open the repository containing `cwd`.
///
/// # Errors
///
/// [`AnalyzeError::NotARepository`] when discovery fails or the repository
/// is bare.
pub fn open_repository(cwd: &Path) -> Result<Git, AnalyzeError> {
    Git::open(cwd).map_err(|e| match e {
        GitError::NotARepo { .. } | GitError::BareRepo => AnalyzeError::NotARepository,
        other => AnalyzeError::Git(other),
    })
}

/// Analyze the repository at `cwd` against `target`.
///
/// Convenience wrapper over the charset check, repository discovery, and
/// [`analyze_repo`].
pub fn analyze(
    cwd: &Path,
    target: &str,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport, AnalyzeError> {
    // Fail fast on a malformed reference before touching the repository.
    let target =
        BranchRef::new(target).map_err(|e| AnalyzeError::InvalidReference(e.to_string()))?;
    let git = open_repository(cwd)?;
    analyze_repo(&git, &target, options)
}

/// Analyze an already-opened repository against a validated target.
pub fn analyze_repo(
    git: &Git,
    target: &BranchRef,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport, AnalyzeError> {
    let mut warnings = Vec::new();

    let resolved = validate::resolve_target(git, target, options.auto_refresh, &mut warnings)?;

    let current_branch = git
        .current_branch()
        .ok()
        .flatten()
        .unwrap_or_else(|| "HEAD".to_string());

    let relationship = classify::classify(git, &resolved.oid);
    let significance = significance::assess(git, &resolved.oid, &mut warnings);
    let basic_stats = basic_stats(git, &resolved.oid);
    let merge_history = flow::scan(git, options.merge_scan_limit);
    let working_area = working_area(git, &mut warnings);

    let current_info = branch_summary(git, &current_branch, git.head_oid().ok().as_ref());
    let target_info = branch_summary(git, &resolved.name, Some(&resolved.oid));

    Ok(AnalysisReport {
        current_branch,
        target_branch: target.to_string(),
        resolved_target: resolved.name,
        relationship,
        significance,
        basic_stats,
        merge_history,
        working_area,
        current_info,
        target_info,
        warnings,
    })
}

/// Raw ahead/behind counts, merges included. Informational; failures just
/// leave the counts at zero.
fn basic_stats(git: &Git, target: &Oid) -> BasicStats {
    let Ok(current) = git.head_oid() else {
        return BasicStats::default();
    };
    let ahead = git
        .commits_only_in(&current, target)
        .map(|c| c.len())
        .unwrap_or(0);
    let behind = git
        .commits_only_in(target, &current)
        .map(|c| c.len())
        .unwrap_or(0);
    BasicStats { ahead, behind }
}

fn working_area(git: &Git, warnings: &mut Vec<String>) -> WorkingAreaStatus {
    match git.working_tree_entries() {
        Ok(entries) => WorkingAreaStatus::with_entries(entries),
        Err(e) => {
            warnings.push(format!("working tree status unavailable ({e})"));
            WorkingAreaStatus::clean()
        }
    }
}

fn branch_summary(git: &Git, name: &str, oid: Option<&Oid>) -> BranchSummary {
    let Some(oid) = oid else {
        return BranchSummary::unknown(name);
    };
    match git.commit_summary(oid) {
        Ok(summary) => BranchSummary {
            name: name.to_string(),
            short_hash: oid.short(7).to_string(),
            summary: summary.summary,
            author: summary.author,
            relative_date: crate::core::types::relative_age(summary.time),
        },
        Err(_) => BranchSummary::unknown(name),
    }
}
