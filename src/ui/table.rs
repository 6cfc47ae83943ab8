//! ui::table
//!
//! Fixed-width rendering of report sections.
//!
//! # Layout
//!
//! ```text
//! ── UNMERGED ─────────────────────────────
//! 1a2b3c4 2024-03-01 Ada Lovelace | Add engine (HEAD -> main) [Ada Lovelace]
//! 9f8e7d6 2024-02-28 Bob          | (no message)
//! ── MERGED ── no results ─────────────────
//! ```
//!
//! The rule spans the id, date and author columns plus their separators.
//! Padding is computed on plain text before colors are applied, so escape
//! sequences never shift the columns.

use std::io::{self, Write};

use super::palette::{Field, Palette};
use crate::core::record::{CommitRecord, ReportBatch};

const RULE: char = '─';
const COLUMN_SEPARATOR: &str = " | ";
const NO_RESULTS: &str = "no results";

/// Commits printed so far in this invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub printed: usize,
}

/// Renders [`ReportBatch`] sections.
#[derive(Debug, Clone)]
pub struct TableRenderer<'a> {
    palette: &'a Palette,
    show_header: bool,
    show_graph: bool,
}

/// Column widths for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Widths {
    graph: usize,
    id: usize,
    date: usize,
    author: usize,
}

impl Widths {
    fn of(batch: &ReportBatch, show_graph: bool) -> Self {
        let widest = |len: fn(&CommitRecord) -> usize, floor: usize| {
            batch.records.iter().map(len).max().unwrap_or(floor)
        };

        Self {
            graph: if show_graph {
                widest(|r| r.graph.chars().count(), 0)
            } else {
                0
            },
            id: widest(|r| r.id.chars().count(), 7),
            date: widest(|r| r.date.chars().count(), 10),
            author: batch.author_width,
        }
    }

    /// Width of the header rule.
    fn content(&self) -> usize {
        self.graph + self.id + 1 + self.date + 1 + self.author + COLUMN_SEPARATOR.len()
    }
}

impl<'a> TableRenderer<'a> {
    pub fn new(palette: &'a Palette, show_header: bool, show_graph: bool) -> Self {
        Self {
            palette,
            show_header,
            show_graph,
        }
    }

    /// Print `batch` and return the updated running total.
    pub fn render(
        &self,
        out: &mut dyn Write,
        batch: &ReportBatch,
        tally: Tally,
    ) -> io::Result<Tally> {
        let widths = Widths::of(batch, self.show_graph);

        if self.show_header || batch.is_empty() {
            let header = header_rule(&batch.label, batch.is_empty(), widths.content());
            writeln!(out, "{}", self.palette.header(&header))?;
        }

        for record in &batch.records {
            writeln!(out, "{}", self.row(record, &widths))?;
        }

        Ok(Tally {
            printed: tally.printed + batch.len(),
        })
    }

    fn row(&self, record: &CommitRecord, widths: &Widths) -> String {
        let p = self.palette;
        let mut line = String::new();

        if self.show_graph {
            line.push_str(&pad(&record.graph, &record.graph, widths.graph));
        }

        let id = p.paint_field(Field::Id, &record.id, record);
        line.push_str(&pad(&id, &record.id, widths.id));
        line.push(' ');

        let date = p.paint_field(Field::Date, &record.date, record);
        line.push_str(&pad(&date, &record.date, widths.date));
        line.push(' ');

        let author = p.paint_field(Field::Author, &record.author, record);
        line.push_str(&pad(&author, &record.author, widths.author));
        line.push_str(COLUMN_SEPARATOR);

        line.push_str(&p.paint_field(Field::Message, &record.message, record));

        if !record.refs.is_empty() {
            let refs = format!("({})", record.refs);
            line.push(' ');
            line.push_str(&p.paint_field(Field::Refs, &refs, record));
        }

        if let Some(signer) = &record.signer {
            let signer = format!("[{}]", signer);
            line.push(' ');
            line.push_str(&p.paint_field(Field::Signer, &signer, record));
        }

        line
    }
}

/// Right-pad `painted` to `width` using the length of its plain text.
fn pad(painted: &str, plain: &str, width: usize) -> String {
    let fill = width.saturating_sub(plain.chars().count());
    format!("{}{}", painted, " ".repeat(fill))
}

/// `── LABEL ───…`, or `── LABEL ── no results ───…` for an empty section.
fn header_rule(label: &str, empty: bool, width: usize) -> String {
    let mut rule = format!("{RULE}{RULE} {label} ");
    if empty {
        rule.push_str(&format!("{RULE}{RULE} {NO_RESULTS} "));
    }
    let fill = width.saturating_sub(rule.chars().count()).max(2);
    rule.extend(std::iter::repeat(RULE).take(fill));
    rule
}
