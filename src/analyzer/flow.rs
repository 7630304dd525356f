//! analyzer::flow
//!
//! The merge-flow heuristic.
//!
//! Scans the most recent merge commits on the current line and guesses
//! whether they look like an automated "feature -> dev -> main" promotion
//! chain. Source branch names are regex-extracted from merge subjects and
//! are lossy by nature; the whole detection is advisory annotation only and
//! is never fed back into the relationship or significance results. False
//! positives and negatives are acceptable.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::types::{relative_age, FlowDetection, FlowStep, MergeHistory, MergeRecord};
use crate::git::{Git, MergeCommit};

/// How many of the scanned merges the detection rule actually inspects.
const DETECTION_WINDOW: usize = 5;

/// Scan recent merges and run the detection rule.
///
/// A failed history query yields an empty scan (no merges, nothing
/// detected) rather than an error; this annotation is not worth failing
/// the run for.
pub fn scan(git: &Git, limit: usize) -> MergeHistory {
    let merges = match git.recent_merges(limit) {
        Ok(commits) => commits.iter().map(to_record).collect(),
        Err(_) => Vec::new(),
    };
    let flow = detect(&merges);
    MergeHistory { merges, flow }
}

fn to_record(commit: &MergeCommit) -> MergeRecord {
    MergeRecord {
        short_hash: commit.oid.short(7).to_string(),
        subject: commit.subject.clone(),
        relative_date: relative_age(commit.time),
        parent_hashes: commit.parents.iter().map(|p| p.short(7).to_string()).collect(),
        inferred_source_branch: infer_source(&commit.subject),
    }
}

/// Best-effort extraction of the merged-from branch name out of a merge
/// subject. Handles `Merge branch '<name>'` (quotes optional) and
/// `Merge ... from <name>`; anything else is `"unknown"`. A leading
/// `origin/` is stripped.
pub fn infer_source(subject: &str) -> String {
    static BRANCH_RE: OnceLock<Regex> = OnceLock::new();
    static FROM_RE: OnceLock<Regex> = OnceLock::new();

    let branch_re = BRANCH_RE.get_or_init(|| {
        Regex::new(r#"(?i)merge\s+(?:remote-tracking\s+)?branch\s+['"]?([A-Za-z0-9._/-]+)"#)
            .expect("branch regex is valid")
    });
    let from_re = FROM_RE.get_or_init(|| {
        Regex::new(r#"(?i)merge\b.*?\bfrom\s+['"]?([A-Za-z0-9._/-]+)"#)
            .expect("from regex is valid")
    });

    let captured = branch_re
        .captures(subject)
        .or_else(|| from_re.captures(subject))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    match captured {
        Some(name) => name.strip_prefix("origin/").unwrap_or(name).to_string(),
        None => "unknown".to_string(),
    }
}

/// Run the detection rule over already-decomposed merge records.
///
/// Over the most recent [`DETECTION_WINDOW`] merges: if at least one
/// feature-like and one dev-like merge exist, report a two-step promotion
/// chain (dev -> main, then feature -> dev), most recent first. Otherwise,
/// if the two most recent merges came from distinct inferred sources,
/// report a generic consecutive-merge pattern. Otherwise nothing.
pub fn detect(merges: &[MergeRecord]) -> FlowDetection {
    if merges.len() < 2 {
        return FlowDetection::none();
    }

    let recent = &merges[..merges.len().min(DETECTION_WINDOW)];
    let has_feature_like = recent.iter().any(is_feature_like);
    let has_dev_like = recent.iter().any(is_dev_like);

    if has_feature_like && has_dev_like {
        let chain = vec![
            FlowStep {
                step: 1,
                from: recent[0].inferred_source_branch.clone(),
                to: "main".to_string(),
                hash: recent[0].short_hash.clone(),
            },
            FlowStep {
                step: 2,
                from: recent[1].inferred_source_branch.clone(),
                to: "dev".to_string(),
                hash: recent[1].short_hash.clone(),
            },
        ];
        return FlowDetection {
            detected: true,
            description: Some("automated promotion flow (feature -> dev -> main)".to_string()),
            chain,
        };
    }

    if merges[0].inferred_source_branch != merges[1].inferred_source_branch {
        let chain = vec![
            FlowStep {
                step: 1,
                from: merges[0].inferred_source_branch.clone(),
                to: "current".to_string(),
                hash: merges[0].short_hash.clone(),
            },
            FlowStep {
                step: 2,
                from: merges[1].inferred_source_branch.clone(),
                to: "previous".to_string(),
                hash: merges[1].short_hash.clone(),
            },
        ];
        return FlowDetection {
            detected: true,
            description: Some("consecutive merges from different branches".to_string()),
            chain,
        };
    }

    FlowDetection::none()
}

fn is_feature_like(record: &MergeRecord) -> bool {
    static NUMBERED_RE: OnceLock<Regex> = OnceLock::new();
    let numbered_re = NUMBERED_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+_\d+").expect("numbered regex is valid"));

    let source = &record.inferred_source_branch;
    source.contains("feature")
        || source.contains("dev_")
        || numbered_re.is_match(source)
        || record.subject.to_lowercase().contains("feature")
}

fn is_dev_like(record: &MergeRecord) -> bool {
    let source = &record.inferred_source_branch;
    source == "dev" || source == "develop" || record.subject.to_lowercase().contains("dev")
}
