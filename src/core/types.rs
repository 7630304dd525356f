//! core::types
//!
//! Strong types for the analyzer's domain.
//!
//! # Types
//!
//! - [`BranchRef`] - Validated target reference string
//! - [`Oid`] - Git object identifier (SHA)
//! - [`RelationshipResult`] - Qualitative branch relationship with confidence
//! - [`SignificanceResult`] - Whether a relationship reflects real code change
//! - [`MergeRecord`] / [`FlowDetection`] - Merge-history scan results
//! - [`WorkingAreaStatus`] - Working-tree snapshot
//! - [`AnalysisReport`] - The assembled, serializable result record
//!
//! # Validation
//!
//! `BranchRef` and `Oid` enforce validity at construction time. Invalid
//! values cannot be represented, so no oracle query ever sees one.
//!
//! All result records are computed once per invocation and never mutated;
//! the presentation layer and the `--json` mode both consume them read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// A validated target reference (local branch name or `remote/name`).
///
/// References are restricted to the charset `[A-Za-z0-9._/-]` and must be
/// non-empty. Anything else is rejected before any repository query runs.
///
/// # Example
///
/// ```
/// use driftcheck::core::types::BranchRef;
///
/// let r = BranchRef::new("origin/main").unwrap();
/// assert_eq!(r.as_str(), "origin/main");
/// assert!(r.is_remote_like());
///
/// assert!(BranchRef::new("").is_err());
/// assert!(BranchRef::new("has space").is_err());
/// assert!(BranchRef::new("$(rm -rf)").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchRef(String);

impl BranchRef {
    /// Create a new validated reference.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidReference` if the string is empty or
    /// contains characters outside `[A-Za-z0-9._/-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidReference(
                "reference cannot be empty".into(),
            ));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-')))
        {
            return Err(TypeError::InvalidReference(format!(
                "reference cannot contain '{c}'"
            )));
        }
        Ok(Self(name))
    }

    /// Get the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Heuristic for "looks like a remote-tracking ref" (contains `/`).
    ///
    /// Used to decide whether a remote refresh is worth attempting before
    /// resolution. It is only a hint; resolution tries local names first
    /// regardless.
    pub fn is_remote_like(&self) -> bool {
        self.0.contains('/')
    }

    /// The reference with any leading `origin/` stripped.
    ///
    /// # Example
    ///
    /// ```
    /// use driftcheck::core::types::BranchRef;
    ///
    /// let r = BranchRef::new("origin/dev").unwrap();
    /// assert_eq!(r.without_origin_prefix(), "dev");
    ///
    /// let local = BranchRef::new("dev").unwrap();
    /// assert_eq!(local.without_origin_prefix(), "dev");
    /// ```
    pub fn without_origin_prefix(&self) -> &str {
        self.0.strip_prefix("origin/").unwrap_or(&self.0)
    }
}

impl TryFrom<String> for BranchRef {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchRef> for String {
    fn from(r: BranchRef) -> Self {
        r.0
    }
}

impl AsRef<str> for BranchRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase.
///
/// # Example
///
/// ```
/// use driftcheck::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not 40 or 64 hex
    /// characters.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid("object id must be hexadecimal".into()));
        }
        Ok(Self(oid))
    }

    /// Get an abbreviated form (first `len` characters, clamped).
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative relationship between HEAD and the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Both point at the same content.
    Synchronized,
    /// HEAD has commits the target lacks; all target content is contained.
    Ahead,
    /// The target has commits HEAD lacks.
    Behind,
    /// Both sides have commits the other lacks.
    Diverged,
    /// Could not be determined (some query failed).
    Unknown,
}

impl Relationship {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Relationship::Synchronized => "synchronized",
            Relationship::Ahead => "ahead",
            Relationship::Behind => "behind",
            Relationship::Diverged => "diverged",
            Relationship::Unknown => "unknown",
        }
    }
}

/// Confidence attached to a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// The classifier's verdict. Computed once per invocation, immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipResult {
    pub relationship: Relationship,
    pub confidence: Confidence,
}

impl RelationshipResult {
    pub fn new(relationship: Relationship, confidence: Confidence) -> Self {
        Self {
            relationship,
            confidence,
        }
    }

    /// The degraded verdict used when any oracle query fails.
    pub fn unknown() -> Self {
        Self::new(Relationship::Unknown, Confidence::Low)
    }
}

/// Whether the relationship reflects a real code difference, as opposed to
/// a difference in merge/history shape only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub is_significant: bool,
    /// Non-merge commits HEAD has beyond the common ancestor.
    pub ahead_meaningful: usize,
    /// Non-merge commits the target has beyond the common ancestor.
    pub behind_meaningful: usize,
    pub has_file_level_diff: bool,
    /// The merge base the counts are relative to. `None` when it could not
    /// be resolved, in which case significance is assumed.
    pub common_ancestor: Option<Oid>,
}

impl SignificanceResult {
    /// Combine measured inputs. `is_significant` is the OR of a file-level
    /// diff and either meaningful commit count being non-zero.
    pub fn measured(
        ahead_meaningful: usize,
        behind_meaningful: usize,
        has_file_level_diff: bool,
        common_ancestor: Oid,
    ) -> Self {
        Self {
            is_significant: has_file_level_diff || ahead_meaningful > 0 || behind_meaningful > 0,
            ahead_meaningful,
            behind_meaningful,
            has_file_level_diff,
            common_ancestor: Some(common_ancestor),
        }
    }

    /// The safety default: when the merge base (or any query under it)
    /// cannot be resolved, report maximal significance rather than silently
    /// hiding a real divergence.
    pub fn assumed_significant() -> Self {
        Self {
            is_significant: true,
            ahead_meaningful: 0,
            behind_meaningful: 0,
            has_file_level_diff: true,
            common_ancestor: None,
        }
    }
}

/// Raw ahead/behind commit counts, merges included. Informational only;
/// the significance filter is what separates history noise from content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicStats {
    pub ahead: usize,
    pub behind: usize,
}

/// One recent merge commit, decomposed for the flow heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRecord {
    pub short_hash: String,
    pub subject: String,
    pub relative_date: String,
    pub parent_hashes: Vec<String>,
    /// Best-effort regex extraction from the subject; `"unknown"` when no
    /// pattern matched. Never fed back into relationship or significance.
    pub inferred_source_branch: String,
}

/// One step in a detected merge chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub step: usize,
    pub from: String,
    pub to: String,
    pub hash: String,
}

/// Advisory detection of an automated promotion flow over recent merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDetection {
    pub detected: bool,
    pub description: Option<String>,
    pub chain: Vec<FlowStep>,
}

impl FlowDetection {
    pub fn none() -> Self {
        Self {
            detected: false,
            description: None,
            chain: Vec::new(),
        }
    }
}

/// Kind of change for a working-tree entry.
///
/// Entries whose underlying status maps to none of the first four kinds
/// (renames, type changes) are reported as [`ChangeKind::Other`] and
/// labelled `unknown` rather than left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
    Untracked,
    Other,
}

impl ChangeKind {
    /// Display label for the change kind.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "modified",
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Untracked => "untracked",
            ChangeKind::Other => "unknown",
        }
    }
}

/// A single changed working-tree entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedEntry {
    pub path: String,
    pub kind: ChangeKind,
}

/// Snapshot of the working tree at analysis time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingAreaStatus {
    pub is_clean: bool,
    pub changed_entries: Vec<ChangedEntry>,
}

impl WorkingAreaStatus {
    pub fn clean() -> Self {
        Self {
            is_clean: true,
            changed_entries: Vec::new(),
        }
    }

    pub fn with_entries(changed_entries: Vec<ChangedEntry>) -> Self {
        Self {
            is_clean: changed_entries.is_empty(),
            changed_entries,
        }
    }
}

/// Tip-of-branch metadata for display. Fields degrade to `"unknown"` when
/// the underlying query fails; metadata is never load-bearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub name: String,
    pub short_hash: String,
    pub summary: String,
    pub author: String,
    pub relative_date: String,
}

impl BranchSummary {
    /// Placeholder summary when the tip cannot be read.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_hash: "unknown".into(),
            summary: "unknown".into(),
            author: "unknown".into(),
            relative_date: "unknown".into(),
        }
    }
}

/// Merge-history scan: the records plus what the heuristic made of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeHistory {
    pub merges: Vec<MergeRecord>,
    pub flow: FlowDetection,
}

/// The full analysis result. This is the `--json` contract surface: field
/// names are stable, snake_case, and additions are backwards-compatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Current branch name, or `"HEAD"` when detached.
    pub current_branch: String,
    /// The target reference exactly as given.
    pub target_branch: String,
    /// The reference that actually resolved (e.g. `origin/main` when the
    /// local name did not exist).
    pub resolved_target: String,
    pub relationship: RelationshipResult,
    pub significance: SignificanceResult,
    pub basic_stats: BasicStats,
    pub merge_history: MergeHistory,
    pub working_area: WorkingAreaStatus,
    pub current_info: BranchSummary,
    pub target_info: BranchSummary,
    /// Non-fatal problems encountered along the way (failed remote refresh,
    /// queries that fell back to safe defaults).
    pub warnings: Vec<String>,
}

/// Format a timestamp as a coarse relative age ("3 days ago").
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use driftcheck::core::types::relative_age;
///
/// let t = Utc::now() - Duration::days(3);
/// assert_eq!(relative_age(t), "3 days ago");
/// ```
pub fn relative_age(time: DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(time);
    let seconds = delta.num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }

    let (count, unit) = if seconds < 60 {
        return "just now".to_string();
    } else if seconds < 3600 {
        (delta.num_minutes(), "minute")
    } else if seconds < 86_400 {
        (delta.num_hours(), "hour")
    } else if seconds < 7 * 86_400 {
        (delta.num_days(), "day")
    } else if seconds < 30 * 86_400 {
        (delta.num_weeks(), "week")
    } else if seconds < 365 * 86_400 {
        (delta.num_days() / 30, "month")
    } else {
        (delta.num_days() / 365, "year")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_ref {
        use super::*;

        #[test]
        fn valid_references() {
            assert!(BranchRef::new("main").is_ok());
            assert!(BranchRef::new("origin/main").is_ok());
            assert!(BranchRef::new("feature/foo-1.2_x").is_ok());
            assert!(BranchRef::new("release-2024.01").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(BranchRef::new("").is_err());
        }

        #[test]
        fn out_of_charset_rejected() {
            assert!(BranchRef::new("has space").is_err());
            assert!(BranchRef::new("semi;colon").is_err());
            assert!(BranchRef::new("back`tick").is_err());
            assert!(BranchRef::new("dollar$sign").is_err());
            assert!(BranchRef::new("tab\tchar").is_err());
            assert!(BranchRef::new("ünïcode").is_err());
        }

        #[test]
        fn remote_like_heuristic() {
            assert!(BranchRef::new("origin/main").unwrap().is_remote_like());
            assert!(BranchRef::new("feature/foo").unwrap().is_remote_like());
            assert!(!BranchRef::new("main").unwrap().is_remote_like());
        }

        #[test]
        fn origin_prefix_stripped_once() {
            let r = BranchRef::new("origin/origin-tools").unwrap();
            assert_eq!(r.without_origin_prefix(), "origin-tools");
            let nested = BranchRef::new("origin/origin/dev").unwrap();
            assert_eq!(nested.without_origin_prefix(), "origin/dev");
        }

        #[test]
        fn serde_roundtrip() {
            let r = BranchRef::new("origin/dev").unwrap();
            let json = serde_json::to_string(&r).unwrap();
            let parsed: BranchRef = serde_json::from_str(&json).unwrap();
            assert_eq!(r, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            assert!(serde_json::from_str::<BranchRef>("\"bad name\"").is_err());
        }
    }

    mod oid {
        use super::*;

        #[test]
        fn valid_sha1() {
            assert!(Oid::new("abc123def4567890abc123def4567890abc12345").is_ok());
        }

        #[test]
        fn normalizes_to_lowercase() {
            let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
            assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
        }

        #[test]
        fn short_form_clamped() {
            let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
            assert_eq!(oid.short(7), "abc123d");
            assert_eq!(oid.short(100), oid.as_str());
        }

        #[test]
        fn invalid_rejected() {
            assert!(Oid::new("").is_err());
            assert!(Oid::new("abc123").is_err());
            assert!(Oid::new("xyz123def4567890abc123def4567890abc12345").is_err());
        }
    }

    mod significance {
        use super::*;

        fn ancestor() -> Oid {
            Oid::new("abc123def4567890abc123def4567890abc12345").unwrap()
        }

        #[test]
        fn all_zero_inputs_not_significant() {
            let s = SignificanceResult::measured(0, 0, false, ancestor());
            assert!(!s.is_significant);
        }

        #[test]
        fn file_diff_alone_is_significant() {
            let s = SignificanceResult::measured(0, 0, true, ancestor());
            assert!(s.is_significant);
        }

        #[test]
        fn commit_counts_alone_are_significant() {
            assert!(SignificanceResult::measured(3, 0, false, ancestor()).is_significant);
            assert!(SignificanceResult::measured(0, 2, false, ancestor()).is_significant);
        }

        #[test]
        fn assumed_significant_when_base_missing() {
            let s = SignificanceResult::assumed_significant();
            assert!(s.is_significant);
            assert!(s.has_file_level_diff);
            assert!(s.common_ancestor.is_none());
        }
    }

    mod labels {
        use super::*;

        #[test]
        fn relationship_labels_are_lowercase_words() {
            assert_eq!(Relationship::Synchronized.label(), "synchronized");
            assert_eq!(Relationship::Diverged.label(), "diverged");
            assert_eq!(Relationship::Unknown.label(), "unknown");
        }

        #[test]
        fn confidence_labels_are_lowercase_words() {
            assert_eq!(Confidence::High.label(), "high");
            assert_eq!(Confidence::Medium.label(), "medium");
            assert_eq!(Confidence::Low.label(), "low");
        }
    }

    mod change_kind {
        use super::*;

        #[test]
        fn other_labelled_unknown() {
            assert_eq!(ChangeKind::Other.label(), "unknown");
            assert_eq!(ChangeKind::Modified.label(), "modified");
            assert_eq!(ChangeKind::Untracked.label(), "untracked");
        }
    }

    mod relative_age {
        use super::*;
        use chrono::Duration;

        #[test]
        fn recent_is_just_now() {
            assert_eq!(relative_age(Utc::now()), "just now");
        }

        #[test]
        fn units_scale() {
            assert_eq!(
                relative_age(Utc::now() - Duration::minutes(5)),
                "5 minutes ago"
            );
            assert_eq!(relative_age(Utc::now() - Duration::hours(1)), "1 hour ago");
            assert_eq!(relative_age(Utc::now() - Duration::days(3)), "3 days ago");
            assert_eq!(relative_age(Utc::now() - Duration::weeks(2)), "2 weeks ago");
            assert_eq!(
                relative_age(Utc::now() - Duration::days(400)),
                "1 year ago"
            );
        }
    }
}
