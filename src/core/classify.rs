//! core::classify
//!
//! Decides how a target relates to its upstream tracking branch and which
//! history ranges the report should request.
//!
//! # Modes
//!
//! | Facts                                  | Mode          | Sections            |
//! |----------------------------------------|---------------|---------------------|
//! | no upstream                            | `NoUpstream`  | `NO UPSTREAM`       |
//! | upstream, no merge-base, not ancestor  | `Unrelated`   | `UNRELATED`         |
//! | upstream with shared history           | `Diverged`    | `UNMERGED`,`MERGED` |
//!
//! # Budget
//!
//! A single commit budget `N` covers the whole report. In diverged mode the
//! unmerged range is requested with limit `N`, and the merged range only
//! receives whatever the unmerged section left over.
//!
//! Everything here is pure; the facts are gathered by the engine.

use std::path::PathBuf;

use super::refs::Target;
use super::types::Oid;

/// Boolean topology facts that fully determine the report mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyFacts {
    /// An upstream tracking ref is configured.
    pub has_upstream: bool,
    /// The upstream is an ancestor of the target.
    pub upstream_is_ancestor: bool,
    /// The target and upstream share a merge-base.
    pub has_merge_base: bool,
}

/// What is known about the target's upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFacts {
    /// Upstream ref name, e.g. `origin/main`.
    pub name: String,
    /// Merge-base of target and upstream.
    pub merge_base: Option<Oid>,
    /// Whether the upstream is an ancestor of the target.
    pub upstream_is_ancestor: bool,
}

impl TopologyFacts {
    pub fn from_upstream(upstream: Option<&UpstreamFacts>) -> Self {
        match upstream {
            None => Self::default(),
            Some(u) => Self {
                has_upstream: true,
                upstream_is_ancestor: u.upstream_is_ancestor,
                has_merge_base: u.merge_base.is_some(),
            },
        }
    }
}

/// Report mode, chosen once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportMode {
    NoUpstream,
    Unrelated,
    Diverged,
}

impl ReportMode {
    /// Select the mode. Total over every combination of facts.
    ///
    /// An upstream that is an ancestor always shares history with the target,
    /// so `upstream_is_ancestor` without a merge-base still counts as diverged.
    pub fn select(facts: TopologyFacts) -> Self {
        match facts {
            TopologyFacts {
                has_upstream: false,
                ..
            } => ReportMode::NoUpstream,
            TopologyFacts {
                upstream_is_ancestor: false,
                has_merge_base: false,
                ..
            } => ReportMode::Unrelated,
            _ => ReportMode::Diverged,
        }
    }

    /// Title of the first (or only) section.
    pub fn primary_label(self) -> &'static str {
        match self {
            ReportMode::NoUpstream => "NO UPSTREAM",
            ReportMode::Unrelated => "UNRELATED",
            ReportMode::Diverged => "UNMERGED",
        }
    }

    /// Title of the second section, if the mode has one.
    pub fn secondary_label(self) -> Option<&'static str> {
        match self {
            ReportMode::Diverged => Some("MERGED"),
            _ => None,
        }
    }

    pub fn is_single_batch(self) -> bool {
        self.secondary_label().is_none()
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Diverged => f.write_str("UNMERGED/MERGED"),
            other => f.write_str(other.primary_label()),
        }
    }
}

/// One history request for the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Revision whose history is listed.
    pub tip: String,
    /// Revision whose history is excluded (`tip ^exclude`).
    pub exclude: Option<String>,
    /// Maximum number of commits.
    pub limit: usize,
    /// Limit history to this path.
    pub file: Option<PathBuf>,
}

impl LogQuery {
    /// The revision range in `git log` syntax.
    pub fn range(&self) -> String {
        match &self.exclude {
            Some(exclude) => format!("{}..{}", exclude, self.tip),
            None => self.tip.clone(),
        }
    }
}

/// The classifier's decision for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub mode: ReportMode,
    /// Query for the first section.
    pub primary: LogQuery,
    /// Base of the merged section, in diverged mode.
    merged_base: Option<String>,
    budget: usize,
    hide_merged: bool,
}

impl Classification {
    /// Plan the report for `target` with a total budget of `budget` commits.
    pub fn plan(
        target: &Target,
        upstream: Option<&UpstreamFacts>,
        budget: usize,
        hide_merged: bool,
    ) -> Self {
        let mode = ReportMode::select(TopologyFacts::from_upstream(upstream));

        let merged_base = match (mode, upstream) {
            (ReportMode::Diverged, Some(u)) => Some(
                u.merge_base
                    .as_ref()
                    .map(|oid| oid.as_str().to_string())
                    .unwrap_or_else(|| u.name.clone()),
            ),
            _ => None,
        };

        let primary = LogQuery {
            tip: target.reference.clone(),
            exclude: merged_base.clone(),
            limit: budget,
            file: target.file.clone(),
        };

        Self {
            mode,
            primary,
            merged_base,
            budget,
            hide_merged,
        }
    }

    /// Query for the merged section, given how many commits the unmerged
    /// section printed.
    ///
    /// Returns `None` when the mode has no merged section, when merged
    /// commits are hidden, or when the budget is already spent.
    pub fn merged_query(&self, printed: usize) -> Option<LogQuery> {
        if self.hide_merged || printed >= self.budget {
            return None;
        }
        let base = self.merged_base.as_ref()?;

        Some(LogQuery {
            tip: base.clone(),
            exclude: None,
            limit: self.budget - printed,
            file: self.primary.file.clone(),
        })
    }

    /// Whether section headers are printed.
    ///
    /// Single-section reports drop the header when merged commits are hidden.
    pub fn show_header(&self) -> bool {
        !(self.mode.is_single_batch() && self.hide_merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "1111111111111111111111111111111111111111";

    fn target() -> Target {
        Target {
            reference: "feature".into(),
            file: None,
        }
    }

    fn upstream(merge_base: Option<&str>, is_ancestor: bool) -> UpstreamFacts {
        UpstreamFacts {
            name: "origin/feature".into(),
            merge_base: merge_base.map(|m| Oid::new(m).unwrap()),
            upstream_is_ancestor: is_ancestor,
        }
    }

    #[test]
    fn select_is_total() {
        for bits in 0..8u8 {
            let facts = TopologyFacts {
                has_upstream: bits & 1 != 0,
                upstream_is_ancestor: bits & 2 != 0,
                has_merge_base: bits & 4 != 0,
            };
            let mode = ReportMode::select(facts);
            if !facts.has_upstream {
                assert_eq!(mode, ReportMode::NoUpstream);
            }
        }
    }

    #[test]
    fn no_upstream() {
        let plan = Classification::plan(&target(), None, 12, false);
        assert_eq!(plan.mode, ReportMode::NoUpstream);
        assert_eq!(plan.primary.range(), "feature");
        assert_eq!(plan.primary.limit, 12);
        assert_eq!(plan.merged_query(0), None);
    }

    #[test]
    fn unrelated() {
        let up = upstream(None, false);
        let plan = Classification::plan(&target(), Some(&up), 12, false);
        assert_eq!(plan.mode, ReportMode::Unrelated);
        assert_eq!(plan.primary.exclude, None);
        assert_eq!(plan.merged_query(0), None);
    }

    #[test]
    fn diverged_ranges() {
        let up = upstream(Some(BASE), false);
        let plan = Classification::plan(&target(), Some(&up), 12, false);
        assert_eq!(plan.mode, ReportMode::Diverged);
        assert_eq!(plan.primary.range(), format!("{BASE}..feature"));

        let merged = plan.merged_query(3).unwrap();
        assert_eq!(merged.tip, BASE);
        assert_eq!(merged.limit, 9);
    }

    #[test]
    fn ancestor_without_merge_base_uses_upstream() {
        let up = upstream(None, true);
        let plan = Classification::plan(&target(), Some(&up), 5, false);
        assert_eq!(plan.mode, ReportMode::Diverged);
        assert_eq!(plan.primary.exclude.as_deref(), Some("origin/feature"));
    }

    #[test]
    fn merged_skipped_when_budget_spent() {
        let up = upstream(Some(BASE), false);
        let plan = Classification::plan(&target(), Some(&up), 4, false);
        assert_eq!(plan.merged_query(4), None);
        assert_eq!(plan.merged_query(5), None);
        assert_eq!(plan.merged_query(3).map(|q| q.limit), Some(1));
    }

    #[test]
    fn merged_skipped_when_hidden() {
        let up = upstream(Some(BASE), false);
        let plan = Classification::plan(&target(), Some(&up), 12, true);
        assert_eq!(plan.merged_query(0), None);
        assert!(plan.show_header());
    }

    #[test]
    fn single_batch_hides_header_with_hide_merged() {
        let plan = Classification::plan(&target(), None, 12, true);
        assert!(!plan.show_header());
        let plan = Classification::plan(&target(), None, 12, false);
        assert!(plan.show_header());
    }

    #[test]
    fn file_scope_carried_to_both_queries() {
        let t = Target {
            reference: "HEAD".into(),
            file: Some(PathBuf::from("src/lib.rs")),
        };
        let up = upstream(Some(BASE), false);
        let plan = Classification::plan(&t, Some(&up), 12, false);
        assert_eq!(plan.primary.file, t.file);
        assert_eq!(plan.merged_query(0).unwrap().file, t.file);
    }
}
