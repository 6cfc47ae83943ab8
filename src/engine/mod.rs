//! engine
//!
//! Orchestrates one report: Resolve -> Classify -> Query -> Parse -> Render.
//!
//! # Architecture
//!
//! The engine owns no state between invocations. The CLI builds a
//! [`Context`] from flags, opens the repository, and hands both to
//! [`report::run_report`], which drives the pure core modules against the
//! [`crate::git::HistoryQuery`] collaborator.

pub mod report;

pub use report::{run_report, Budget, ReportOptions, ReportSummary, SectionSummary};

use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// Execution context for a report.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (errors only).
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}
