//! git::interface
//!
//! Git oracle implementation using git2.
//!
//! This module is the **single doorway** to the repository. Every query the
//! analyzer needs flows through [`Git`], which returns strong types and
//! normalizes git2 failures into typed categories. No other module imports
//! `git2`.
//!
//! Every operation except [`Git::fetch_all_remotes`] is read-only and
//! idempotent: the same inputs against an unchanged repository yield the
//! same outputs. The fetch is best-effort remote metadata refresh and is the
//! only network-touching call.
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: not inside a Git repository
//! - [`GitError::RefNotFound`]: requested ref does not exist
//! - [`GitError::ObjectNotFound`]: commit/tree lookup failed
//! - [`GitError::Internal`]: anything else git2 reports
//!
//! Callers above the validation layer are expected to catch these at the
//! point of use and degrade to conservative defaults; they are never fatal
//! to the overall run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::{ChangeKind, ChangedEntry, Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context == "HEAD" {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    fn internal(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidReference(msg) => GitError::RefNotFound { refname: msg },
        }
    }
}

/// A merge commit decomposed for the flow heuristic.
#[derive(Debug, Clone)]
pub struct MergeCommit {
    /// The merge commit OID
    pub oid: Oid,
    /// First line of the commit message
    pub subject: String,
    /// Author timestamp
    pub time: DateTime<Utc>,
    /// Parent OIDs (two or more, by construction)
    pub parents: Vec<Oid>,
}

/// Tip-of-branch commit metadata.
#[derive(Debug, Clone)]
pub struct CommitSummary {
    pub oid: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Author name
    pub author: String,
    /// Author timestamp
    pub time: DateTime<Utc>,
}

/// The Git oracle.
///
/// # Example
///
/// ```ignore
/// use driftcheck::git::Git;
/// use std::path::Path;
///
/// let git = Git::open(Path::new("."))?;
/// let head = git.head_oid()?;
/// if let Some(main) = git.try_resolve_ref("refs/heads/main")? {
///     let base = git.merge_base(&head, &main)?;
/// }
/// ```
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("path", &self.repo.path()).finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening
    // =========================================================================

    /// Open a repository at or above the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Path to the .git directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    // =========================================================================
    // Ref Resolution
    // =========================================================================

    /// Resolve a fully-qualified ref to its commit OID.
    ///
    /// Peels through symbolic refs and tags.
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| GitError::from_git2(e, refname))?;

        let oid = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname))?
            .id();

        Oid::new(oid.to_string()).map_err(Into::into)
    }

    /// Resolve a ref, returning `None` if it doesn't exist.
    pub fn try_resolve_ref(&self, refname: &str) -> Result<Option<Oid>, GitError> {
        match self.resolve_ref(refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(GitError::RefNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get HEAD commit OID.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (new repository)
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let oid = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?
            .id();

        Oid::new(oid.to_string()).map_err(Into::into)
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::internal(e)),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(Some(name.to_string()));
            }
        }

        Ok(None) // Detached HEAD
    }

    // =========================================================================
    // Ancestry Queries
    // =========================================================================

    /// Find the merge base (most recent common ancestor) of two commits.
    ///
    /// Returns `None` if there is no common ancestor.
    pub fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError> {
        let oid_a = to_git2_oid(a)?;
        let oid_b = to_git2_oid(b)?;

        match self.repo.merge_base(oid_a, oid_b) {
            Ok(oid) => Ok(Some(Oid::new(oid.to_string())?)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::internal(e)),
        }
    }

    /// Commits reachable from `tip` but not from `exclude`, newest first.
    ///
    /// The emptiness and size of this set drive the relationship classifier;
    /// its length (merges included) is the raw ahead/behind count.
    pub fn commits_only_in(&self, tip: &Oid, exclude: &Oid) -> Result<Vec<Oid>, GitError> {
        let mut revwalk = self.revwalk_between(exclude, tip)?;

        let mut oids = Vec::new();
        for entry in revwalk.by_ref() {
            let oid = entry.map_err(GitError::internal)?;
            oids.push(Oid::new(oid.to_string())?);
        }
        Ok(oids)
    }

    /// Count non-merge commits reachable from `tip` but not from `base`.
    ///
    /// A non-merge commit has at most one parent and represents an atomic
    /// content change; merge commits join histories without (normally)
    /// introducing content, so the significance filter excludes them.
    pub fn count_non_merge_commits(&self, base: &Oid, tip: &Oid) -> Result<usize, GitError> {
        let revwalk = self.revwalk_between(base, tip)?;

        let mut count = 0;
        for entry in revwalk {
            let oid = entry.map_err(GitError::internal)?;
            let commit = self.repo.find_commit(oid).map_err(GitError::internal)?;
            if commit.parent_count() <= 1 {
                count += 1;
            }
        }
        Ok(count)
    }

    fn revwalk_between(&self, exclude: &Oid, tip: &Oid) -> Result<git2::Revwalk<'_>, GitError> {
        let tip_oid = to_git2_oid(tip)?;
        let exclude_oid = to_git2_oid(exclude)?;

        let mut revwalk = self.repo.revwalk().map_err(GitError::internal)?;
        revwalk.push(tip_oid).map_err(GitError::internal)?;
        revwalk.hide(exclude_oid).map_err(GitError::internal)?;
        Ok(revwalk)
    }

    // =========================================================================
    // Content Queries
    // =========================================================================

    /// Paths that differ between the trees of two commits.
    ///
    /// An empty result means the two commits point at identical content even
    /// if their histories differ.
    pub fn diff_paths(&self, a: &Oid, b: &Oid) -> Result<Vec<String>, GitError> {
        let tree_a = self.commit_tree(a)?;
        let tree_b = self.commit_tree(b)?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&tree_a), Some(&tree_b), None)
            .map_err(GitError::internal)?;

        let mut paths = Vec::new();
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path());
            if let Some(p) = path {
                paths.push(p.to_string_lossy().into_owned());
            }
        }
        Ok(paths)
    }

    fn commit_tree(&self, oid: &Oid) -> Result<git2::Tree<'_>, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;
        commit.tree().map_err(GitError::internal)
    }

    // =========================================================================
    // History Scanning
    // =========================================================================

    /// The most recent merge commits reachable from HEAD, newest first.
    pub fn recent_merges(&self, limit: usize) -> Result<Vec<MergeCommit>, GitError> {
        let head = to_git2_oid(&self.head_oid()?)?;

        let mut revwalk = self.repo.revwalk().map_err(GitError::internal)?;
        revwalk.push(head).map_err(GitError::internal)?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(GitError::internal)?;

        let mut merges = Vec::new();
        for entry in revwalk {
            if merges.len() >= limit {
                break;
            }
            let oid = entry.map_err(GitError::internal)?;
            let commit = self.repo.find_commit(oid).map_err(GitError::internal)?;
            if commit.parent_count() < 2 {
                continue;
            }

            let mut parents = Vec::with_capacity(commit.parent_count());
            for parent in commit.parent_ids() {
                parents.push(Oid::new(parent.to_string())?);
            }

            merges.push(MergeCommit {
                oid: Oid::new(oid.to_string())?,
                subject: commit.summary().unwrap_or("").to_string(),
                time: commit_time(&commit),
                parents,
            });
        }
        Ok(merges)
    }

    /// Tip metadata for a commit (subject, author, timestamp).
    pub fn commit_summary(&self, oid: &Oid) -> Result<CommitSummary, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        // The signature borrows the commit; copy the name out before the
        // commit is dropped at the end of the expression.
        let author = commit.author().name().unwrap_or("").to_string();

        Ok(CommitSummary {
            oid: oid.clone(),
            summary: commit.summary().unwrap_or("").to_string(),
            author,
            time: commit_time(&commit),
        })
    }

    // =========================================================================
    // Working Tree
    // =========================================================================

    /// Changed working-tree entries, untracked files included.
    ///
    /// Status flags that match none of the four primary kinds (renames,
    /// type changes) map to [`ChangeKind::Other`].
    pub fn working_tree_entries(&self) -> Result<Vec<ChangedEntry>, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(GitError::internal)?;

        let mut entries = Vec::new();
        for entry in statuses.iter() {
            let status = entry.status();
            if status.is_ignored() {
                continue;
            }

            let kind = if status.is_index_modified() || status.is_wt_modified() {
                ChangeKind::Modified
            } else if status.is_index_new() {
                ChangeKind::Added
            } else if status.is_index_deleted() || status.is_wt_deleted() {
                ChangeKind::Deleted
            } else if status.is_wt_new() {
                ChangeKind::Untracked
            } else {
                ChangeKind::Other
            };

            let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
            entries.push(ChangedEntry { path, kind });
        }
        Ok(entries)
    }

    // =========================================================================
    // Remote Refresh
    // =========================================================================

    /// Fetch default refspecs from every configured remote.
    ///
    /// Best-effort: the caller treats failure as a warning, never as fatal,
    /// and resolution continues against local refs.
    pub fn fetch_all_remotes(&self) -> Result<(), GitError> {
        let remotes = self.repo.remotes().map_err(GitError::internal)?;

        for name in remotes.iter().flatten() {
            let mut remote = self.repo.find_remote(name).map_err(GitError::internal)?;
            remote
                .fetch(&[] as &[&str], None, None)
                .map_err(|e| GitError::Internal {
                    message: format!("fetch from '{}' failed: {}", name, e.message()),
                })?;
        }
        Ok(())
    }
}

fn to_git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
}

fn commit_time(commit: &git2::Commit<'_>) -> DateTime<Utc> {
    DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or(DateTime::UNIX_EPOCH)
}
