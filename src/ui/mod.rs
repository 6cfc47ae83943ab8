//! ui
//!
//! Terminal presentation.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware diagnostics on stderr
//! - [`palette`] - Field color resolution
//! - [`table`] - Fixed-width report sections on stdout

pub mod output;
pub mod palette;
pub mod table;
