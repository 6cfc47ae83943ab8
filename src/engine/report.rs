//! engine::report
//!
//! The report pipeline: Resolve -> Classify -> Query -> Parse -> Render.
//!
//! # Invariants
//!
//! - At most two history queries per invocation
//! - Rows printed across all sections never exceed the budget
//! - The running total is threaded as a value, never stored globally

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::core::classify::{Classification, LogQuery, ReportMode, UpstreamFacts};
use crate::core::record::ReportBatch;
use crate::core::refs::{self, RefDiagnostic, Target};
use crate::git::HistoryQuery;
use crate::ui::output::{self, Verbosity};
use crate::ui::palette::Palette;
use crate::ui::table::{TableRenderer, Tally};

/// How many commits the report may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Exactly this many at most.
    Count(usize),
    /// Everything reachable from the target.
    All,
}

/// Report settings after merging config and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub budget: Budget,
    pub hide_merged: bool,
    pub show_graph: bool,
}

/// One printed section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub label: String,
    pub rows: usize,
}

/// What a report run printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub mode: ReportMode,
    pub target: Target,
    pub sections: Vec<SectionSummary>,
    /// Total rows across all sections.
    pub printed: usize,
    pub diagnostics: Vec<RefDiagnostic>,
}

/// Produce the report for the positional tokens `first` and `second`.
///
/// Token problems are reported as warnings and the report continues with
/// the defaulted target. Errors from the history collaborator propagate.
pub fn run_report<H: HistoryQuery + ?Sized>(
    history: &H,
    first: Option<&str>,
    second: Option<&str>,
    options: &ReportOptions,
    palette: &Palette,
    verbosity: Verbosity,
    out: &mut dyn Write,
) -> Result<ReportSummary> {
    let resolution = refs::resolve(history, first, second);
    for diagnostic in &resolution.diagnostics {
        output::warn(diagnostic, verbosity);
    }
    let target = resolution.target;
    output::debug(
        format!(
            "target: {} ({}){}",
            target.reference,
            resolution
                .kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "default".to_string()),
            target
                .file
                .as_ref()
                .map(|f| format!(" file {}", f.display()))
                .unwrap_or_default()
        ),
        verbosity,
    );

    let budget = match options.budget {
        Budget::Count(n) => n,
        Budget::All => history
            .count_reachable(&target.reference)
            .with_context(|| format!("failed to count commits of {}", target.reference))?,
    };

    let upstream = gather_upstream(history, &target.reference)?;
    if let Some(u) = &upstream {
        output::debug(
            format!(
                "upstream: {} merge-base: {} ancestor: {}",
                u.name,
                u.merge_base
                    .as_ref()
                    .map(|oid| oid.short(12).to_string())
                    .unwrap_or_else(|| "none".to_string()),
                u.upstream_is_ancestor
            ),
            verbosity,
        );
    }

    let plan = Classification::plan(&target, upstream.as_ref(), budget, options.hide_merged);
    output::debug(format!("mode: {} budget: {}", plan.mode, budget), verbosity);

    let renderer = TableRenderer::new(palette, plan.show_header(), options.show_graph);
    let mut sections = Vec::new();

    let batch = fetch(history, plan.mode.primary_label(), &plan.primary, verbosity)?;
    let mut tally = renderer.render(out, &batch, Tally::default())?;
    sections.push(SectionSummary {
        label: batch.label,
        rows: batch.records.len(),
    });

    if let Some(label) = plan.mode.secondary_label() {
        match plan.merged_query(tally.printed) {
            Some(query) => {
                let batch = fetch(history, label, &query, verbosity)?;
                tally = renderer.render(out, &batch, tally)?;
                sections.push(SectionSummary {
                    label: batch.label,
                    rows: batch.records.len(),
                });
            }
            None => output::debug(format!("{} section skipped", label), verbosity),
        }
    }

    Ok(ReportSummary {
        mode: plan.mode,
        target,
        sections,
        printed: tally.printed,
        diagnostics: resolution.diagnostics,
    })
}

/// Look up the upstream of `reference` and its relationship to it.
fn gather_upstream<H: HistoryQuery + ?Sized>(
    history: &H,
    reference: &str,
) -> Result<Option<UpstreamFacts>> {
    let Some(name) = history
        .upstream(reference)
        .with_context(|| format!("failed to read upstream of {}", reference))?
    else {
        return Ok(None);
    };

    let merge_base = history
        .merge_base(reference, &name)
        .with_context(|| format!("failed to compute merge-base of {} and {}", reference, name))?;
    let upstream_is_ancestor = history
        .is_ancestor(&name, reference)
        .with_context(|| format!("failed to compare {} with {}", name, reference))?;

    Ok(Some(UpstreamFacts {
        name,
        merge_base,
        upstream_is_ancestor,
    }))
}

/// Run one query and decode its output.
fn fetch<H: HistoryQuery + ?Sized>(
    history: &H,
    label: &str,
    query: &LogQuery,
    verbosity: Verbosity,
) -> Result<ReportBatch> {
    output::debug(
        format!("query {}: {} (limit {})", label, query.range(), query.limit),
        verbosity,
    );
    let raw = history
        .log(query)
        .with_context(|| format!("failed to read history for {}", query.range()))?;
    Ok(ReportBatch::parse(label, &raw))
}
