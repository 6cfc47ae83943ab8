//! git::interface
//!
//! Repository access using git2.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested revision does not exist
//! - [`GitError::LogFailed`]: `git log` exited unsuccessfully
//!
//! A fresh repository whose HEAD has no commits yet has an empty history,
//! not an error.
//!
//! # Example
//!
//! ```ignore
//! use synclog::git::{Git, HistoryQuery};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! if let Some(upstream) = git.upstream("HEAD")? {
//!     println!("tracking {}", upstream);
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{log, HistoryQuery};
use crate::core::classify::LogQuery;
use crate::core::refs::{RefLookup, DEFAULT_REF};
use crate::core::types::{Oid, RefKind, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Requested revision does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The revision that was not found
        refname: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// The `git` binary could not be started.
    #[error("failed to run git: {message}")]
    Spawn {
        /// The OS error
        message: String,
    },

    /// `git log` exited with a failure status.
    #[error("git log {range} failed: {message}")]
    LogFailed {
        /// The range that was queried
        range: String,
        /// Captured stderr
        message: String,
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
            git2::ErrorCode::NotFound | git2::ErrorCode::Ambiguous => GitError::RefNotFound {
                refname: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
        }
    }
}

/// The real repository.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// Directory the tool runs in; file tokens and `git log` are relative to it.
    cwd: PathBuf,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .field("cwd", &self.cwd)
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            repo,
            cwd: path.to_path_buf(),
        })
    }

    /// Path to the .git directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        if head.is_branch() {
            return Ok(head.shorthand().map(str::to_string));
        }

        Ok(None) // Detached HEAD
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Resolve any revision expression to a commit id.
    fn resolve_commit(&self, rev: &str) -> Result<git2::Oid, GitError> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| GitError::from_git2(e, rev))?;

        object
            .peel_to_commit()
            .map(|c| c.id())
            .map_err(|e| GitError::from_git2(e, rev))
    }

    /// Whether `reference` is HEAD of a branch with no commits yet.
    fn is_unborn(&self, reference: &str) -> bool {
        reference == DEFAULT_REF
            && matches!(self.repo.head(), Err(e) if e.code() == git2::ErrorCode::UnbornBranch)
    }

    fn has_reference(&self, refname: &str) -> bool {
        self.repo.find_reference(refname).is_ok()
    }
}

impl RefLookup for Git {
    fn ref_kind(&self, token: &str) -> Option<RefKind> {
        if self.has_reference(&format!("refs/heads/{}", token)) {
            Some(RefKind::LocalBranch)
        } else if self.has_reference(&format!("refs/remotes/{}", token)) {
            Some(RefKind::RemoteBranch)
        } else if self.has_reference(&format!("refs/tags/{}", token)) {
            Some(RefKind::Tag)
        } else if self.resolve_commit(token).is_ok() {
            Some(RefKind::Commit)
        } else {
            None
        }
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.cwd.join(path).exists()
    }
}

impl HistoryQuery for Git {
    fn upstream(&self, reference: &str) -> Result<Option<String>, GitError> {
        let branch_name = if reference == DEFAULT_REF {
            match self.current_branch()? {
                Some(name) => name,
                None => return Ok(None),
            }
        } else if self
            .ref_kind(reference)
            .is_some_and(RefKind::can_track_upstream)
        {
            reference.to_string()
        } else {
            return Ok(None);
        };

        let branch = self
            .repo
            .find_branch(&branch_name, git2::BranchType::Local)
            .map_err(|e| GitError::from_git2(e, &branch_name))?;

        match branch.upstream() {
            Ok(upstream) => Ok(upstream
                .name()
                .map_err(|e| GitError::from_git2(e, &branch_name))?
                .map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, &branch_name)),
        }
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<Oid>, GitError> {
        let oid_a = self.resolve_commit(a)?;
        let oid_b = self.resolve_commit(b)?;

        match self.repo.merge_base(oid_a, oid_b) {
            Ok(oid) => Ok(Some(Oid::new(oid.to_string())?)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: e.message().to_string(),
            }),
        }
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError> {
        let ancestor_oid = self.resolve_commit(ancestor)?;
        let descendant_oid = self.resolve_commit(descendant)?;

        // A commit is its own ancestor
        if ancestor_oid == descendant_oid {
            return Ok(true);
        }

        self.repo
            .graph_descendant_of(descendant_oid, ancestor_oid)
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })
    }

    fn count_reachable(&self, reference: &str) -> Result<usize, GitError> {
        if self.is_unborn(reference) {
            return Ok(0);
        }
        let tip = self.resolve_commit(reference)?;

        let mut revwalk = self.repo.revwalk().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;
        revwalk.push(tip).map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;

        Ok(revwalk.count())
    }

    fn log(&self, query: &LogQuery) -> Result<String, GitError> {
        if self.is_unborn(&query.tip) {
            return Ok(String::new());
        }
        log::run(&self.cwd, query)
    }
}
