//! git
//!
//! The history-query collaborator.
//!
//! # Architecture
//!
//! The report pipeline only talks to the [`HistoryQuery`] trait. Two
//! implementations exist:
//!
//! - [`Git`] - the real repository. Ref kinds, upstream lookup, merge-base,
//!   ancestry and reachable-commit counts go through `git2`. Formatted
//!   history with signature status goes through the `git` binary, since
//!   signature verification needs git's own gpg integration.
//! - [`mock::MockHistory`] - an in-memory repository for deterministic tests.
//!
//! # Invariants
//!
//! - Every operation here is read-only
//! - Every history query is bounded by an explicit limit

mod interface;
mod log;
pub mod mock;

pub use interface::{Git, GitError};

use crate::core::classify::LogQuery;
use crate::core::refs::RefLookup;
use crate::core::types::Oid;

/// Repository queries the report needs.
pub trait HistoryQuery: RefLookup {
    /// Upstream tracking ref of `reference`, if it is a local branch (or
    /// `HEAD` on a local branch) with one configured.
    fn upstream(&self, reference: &str) -> Result<Option<String>, GitError>;

    /// Merge-base of two revisions, `None` for unrelated histories.
    fn merge_base(&self, a: &str, b: &str) -> Result<Option<Oid>, GitError>;

    /// Whether `ancestor` is reachable from `descendant`.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError>;

    /// Number of commits reachable from `reference`.
    fn count_reachable(&self, reference: &str) -> Result<usize, GitError>;

    /// Formatted history for `query`, one commit per line, newest first.
    fn log(&self, query: &LogQuery) -> Result<String, GitError>;
}
