//! git::mock
//!
//! In-memory history for deterministic testing.
//!
//! # Design
//!
//! The mock stores per-range commit lists and emits them through
//! [`CommitRecord::to_line`], interleaved with graph connector lines, so the
//! decoder sees the same shape as real `git log` output. Every query is
//! recorded for verification.
//!
//! # Example
//!
//! ```
//! use synclog::core::classify::LogQuery;
//! use synclog::core::types::RefKind;
//! use synclog::git::mock::MockHistory;
//! use synclog::git::HistoryQuery;
//!
//! let mock = MockHistory::new()
//!     .with_ref("main", RefKind::LocalBranch)
//!     .with_commits("main", MockHistory::commits("m", 3));
//!
//! let query = LogQuery { tip: "main".into(), exclude: None, limit: 2, file: None };
//! let raw = mock.log(&query).unwrap();
//! assert_eq!(raw.lines().filter(|l| !l.starts_with('|')).count(), 2);
//! assert_eq!(mock.queries(), vec![query]);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{GitError, HistoryQuery};
use crate::core::classify::LogQuery;
use crate::core::record::{CommitRecord, SignatureStatus};
use crate::core::refs::RefLookup;
use crate::core::types::{Oid, RefKind};

/// Mock repository for testing.
#[derive(Debug, Clone, Default)]
pub struct MockHistory {
    refs: HashMap<String, RefKind>,
    paths: HashSet<PathBuf>,
    upstreams: HashMap<String, String>,
    merge_bases: HashMap<(String, String), Oid>,
    ancestors: HashSet<(String, String)>,
    /// Commits listed for a range, keyed by [`LogQuery::range`].
    histories: HashMap<String, Vec<CommitRecord>>,
    /// Recorded log queries, shared across clones.
    queries: Arc<Mutex<Vec<LogQuery>>>,
}

impl MockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ref(mut self, name: &str, kind: RefKind) -> Self {
        self.refs.insert(name.to_string(), kind);
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.paths.insert(PathBuf::from(path));
        self
    }

    /// Configure `upstream` as the tracking ref of `branch`.
    pub fn with_upstream(mut self, branch: &str, upstream: &str) -> Self {
        self.upstreams
            .insert(branch.to_string(), upstream.to_string());
        self
    }

    /// Set the merge-base of `a` and `b` (symmetric).
    pub fn with_merge_base(mut self, a: &str, b: &str, base: Oid) -> Self {
        self.merge_bases
            .insert((a.to_string(), b.to_string()), base.clone());
        self.merge_bases.insert((b.to_string(), a.to_string()), base);
        self
    }

    /// Declare `ancestor` reachable from `descendant`.
    pub fn with_ancestor(mut self, ancestor: &str, descendant: &str) -> Self {
        self.ancestors
            .insert((ancestor.to_string(), descendant.to_string()));
        self
    }

    /// Commits listed for `range` (e.g. `main` or `base..feature`).
    pub fn with_commits(mut self, range: &str, commits: Vec<CommitRecord>) -> Self {
        self.histories.insert(range.to_string(), commits);
        self
    }

    /// Log queries issued so far.
    pub fn queries(&self) -> Vec<LogQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// `count` unsigned commits with ids derived from `prefix`.
    pub fn commits(prefix: &str, count: usize) -> Vec<CommitRecord> {
        (0..count)
            .map(|i| CommitRecord {
                graph: "* ".to_string(),
                id: format!("{:0>7x}", fnv(prefix).wrapping_add(i as u32)),
                date: format!("2024-01-{:02}", 28 - (i % 28)),
                author: format!("{} author", prefix),
                signer: None,
                status: SignatureStatus::Unsigned,
                message: format!("{} commit {}", prefix, i),
                refs: String::new(),
            })
            .collect()
    }
}

/// Small stable hash so different prefixes get different ids.
fn fnv(s: &str) -> u32 {
    s.bytes()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
        & 0x0fff_ffff
}

impl RefLookup for MockHistory {
    fn ref_kind(&self, token: &str) -> Option<RefKind> {
        self.refs.get(token).copied()
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

impl HistoryQuery for MockHistory {
    fn upstream(&self, reference: &str) -> Result<Option<String>, GitError> {
        Ok(self.upstreams.get(reference).cloned())
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<Oid>, GitError> {
        Ok(self
            .merge_bases
            .get(&(a.to_string(), b.to_string()))
            .cloned())
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError> {
        Ok(ancestor == descendant
            || self
                .ancestors
                .contains(&(ancestor.to_string(), descendant.to_string())))
    }

    fn count_reachable(&self, reference: &str) -> Result<usize, GitError> {
        self.histories
            .get(reference)
            .map(Vec::len)
            .ok_or_else(|| GitError::RefNotFound {
                refname: reference.to_string(),
            })
    }

    fn log(&self, query: &LogQuery) -> Result<String, GitError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        let commits = self.histories.get(&query.range()).map(Vec::as_slice);
        let mut lines = Vec::new();
        for record in commits.unwrap_or_default().iter().take(query.limit) {
            lines.push(record.to_line());
            lines.push("|/".to_string());
        }
        Ok(lines.join("\n"))
    }
}
