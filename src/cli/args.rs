//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `-n`, `--count <N>`: commit budget
//! - `-a`, `--all`: budget covers all reachable history
//! - `--no-color`: plain output
//! - `-m`, `--hide-merged`: skip the MERGED section
//! - `--graph`: show the graph prefix
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug diagnostics
//! - `--quiet` / `-q`: Suppress warnings

use clap::Parser;
use std::path::PathBuf;

/// synclog - branch history classified against its upstream
#[derive(Parser, Debug)]
#[command(name = "synclog")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Current branch against its upstream, 12 commits
    synclog

    # A specific branch, 30 commits
    synclog -n 30 feature/login

    # History of one file on the current branch
    synclog src/main.rs

    # History of one file on a tag, unmerged section only
    synclog -m v1.2.0 src/main.rs")]
pub struct Cli {
    /// Branch, tag or commit to report on (default: HEAD); or a file
    #[arg(value_name = "REF")]
    pub reference: Option<String>,

    /// Limit history to this file
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Number of commits to show in total
    #[arg(short = 'n', long, value_parser = parse_count, conflicts_with = "all")]
    pub count: Option<usize>,

    /// Show every commit reachable from REF
    #[arg(short, long)]
    pub all: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not show commits already merged upstream
    #[arg(short = 'm', long)]
    pub hide_merged: bool,

    /// Prefix rows with the commit graph
    #[arg(long)]
    pub graph: bool,

    /// Run as if synclog was started in this directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    pub debug: bool,

    /// Suppress warnings
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// A commit budget of at least one.
fn parse_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
