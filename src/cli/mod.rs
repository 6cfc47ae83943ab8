//! cli
//!
//! Command-line interface layer for synclog.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Merge flags with configuration
//! - Open the repository and delegate to [`crate::engine`]

pub mod args;

pub use args::Cli;

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::engine::{self, Budget, Context, ReportOptions};
use crate::git::Git;
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };
    let verbosity = ctx.verbosity();

    let cwd = match &ctx.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let git = Git::open(&cwd).context("Failed to open repository")?;
    output::debug(format!("repository: {:?}", git), verbosity);

    let config = Config::load(Some(git.git_dir())).context("Failed to load configuration")?;
    if let Some(path) = config.global_config_loaded_from() {
        output::debug(format!("global config: {}", path.display()), verbosity);
    }
    if let Some(path) = config.repo_config_loaded_from() {
        output::debug(format!("repo config: {}", path.display()), verbosity);
    }

    let options = ReportOptions {
        budget: if cli.all {
            Budget::All
        } else {
            Budget::Count(cli.count.unwrap_or_else(|| config.count()))
        },
        hide_merged: cli.hide_merged || config.hide_merged(),
        show_graph: cli.graph || config.graph(),
    };
    let palette = config.palette(color_enabled(&cli, &config));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    engine::run_report(
        &git,
        cli.reference.as_deref(),
        cli.file.as_deref(),
        &options,
        &palette,
        verbosity,
        &mut out,
    )?;
    out.flush().context("Failed to write report")?;

    Ok(())
}

/// Color is on unless disabled by flag, `NO_COLOR`, or config.
fn color_enabled(cli: &Cli, config: &Config) -> bool {
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    !cli.no_color && !no_color_env && config.color()
}
