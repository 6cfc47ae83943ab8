//! core
//!
//! Domain logic for the report. Nothing here performs I/O.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, RefKind
//! - [`refs`] - Positional token resolution
//! - [`classify`] - Upstream relationship and query planning
//! - [`record`] - History line decoding and signature tones
//! - [`config`] - Configuration schema and loading

pub mod classify;
pub mod config;
pub mod record;
pub mod refs;
pub mod types;
