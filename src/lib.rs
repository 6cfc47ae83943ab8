//! synclog - branch history classified against its upstream
//!
//! synclog prints a colorized table of a branch, tag, commit or file's recent
//! history, split into sections by how the target relates to its upstream
//! tracking branch: no upstream, unrelated histories, commits not yet merged
//! upstream, and commits already merged upstream.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Drives Resolve -> Classify -> Query -> Parse -> Render
//! - [`core`] - Pure domain logic: token resolution, classification, decoding
//! - [`git`] - The history-query collaborator and its test double
//! - [`ui`] - Diagnostics, colors and table rendering
//!
//! # Guarantees
//!
//! 1. The repository is never written to
//! 2. At most two bounded history queries run per invocation
//! 3. Malformed history lines are dropped, never rendered half-decoded

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
