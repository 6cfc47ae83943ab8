//! core::refs
//!
//! Resolution of the positional `[REF] [FILE]` tokens into a report target.
//!
//! # Rules
//!
//! - No tokens: the current head, whole history.
//! - One token: a ref if it names one, otherwise a file scoped to the current
//!   head if the path exists.
//! - Two tokens: the first is the ref, the second is the file.
//!
//! Invalid tokens never abort the report. They produce a [`RefDiagnostic`]
//! and the target falls back to the current head (or drops the file scope).

use std::path::{Path, PathBuf};

use super::types::RefKind;

/// Revision used when no valid ref was given.
pub const DEFAULT_REF: &str = "HEAD";

/// Lookups the resolver needs from the repository.
pub trait RefLookup {
    /// Classify `token` if it names a branch, tag, or commit.
    fn ref_kind(&self, token: &str) -> Option<RefKind>;

    /// Whether `path` exists relative to the working directory.
    fn path_exists(&self, path: &Path) -> bool;
}

/// The resolved subject of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Revision whose history is reported.
    pub reference: String,
    /// Optional path that scopes every history query.
    pub file: Option<PathBuf>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REF.to_string(),
            file: None,
        }
    }
}

/// A non-fatal problem with a positional token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefDiagnostic {
    /// A lone token that is neither a ref nor an existing path.
    NoSuchRefOrFile(String),
    /// The first of two tokens is not a ref.
    NoSuchRef(String),
    /// The second of two tokens is not an existing path.
    NoSuchFile(String),
}

impl std::fmt::Display for RefDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefDiagnostic::NoSuchRefOrFile(t) => write!(f, "no such ref or file: {}", t),
            RefDiagnostic::NoSuchRef(t) => write!(f, "no such ref: {}", t),
            RefDiagnostic::NoSuchFile(t) => write!(f, "no such file: {}", t),
        }
    }
}

/// Result of resolving the positional tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: Target,
    /// Kind of the explicit ref, `None` when defaulted.
    pub kind: Option<RefKind>,
    pub diagnostics: Vec<RefDiagnostic>,
}

/// Resolve up to two positional tokens.
pub fn resolve<L: RefLookup + ?Sized>(
    lookup: &L,
    first: Option<&str>,
    second: Option<&str>,
) -> Resolution {
    let mut resolution = Resolution {
        target: Target::default(),
        kind: None,
        diagnostics: Vec::new(),
    };

    match (first, second) {
        (None, _) => {}
        (Some(token), None) => {
            if let Some(kind) = lookup.ref_kind(token) {
                resolution.target.reference = token.to_string();
                resolution.kind = Some(kind);
            } else if lookup.path_exists(Path::new(token)) {
                resolution.target.file = Some(PathBuf::from(token));
            } else {
                resolution
                    .diagnostics
                    .push(RefDiagnostic::NoSuchRefOrFile(token.to_string()));
            }
        }
        (Some(reference), Some(file)) => {
            match lookup.ref_kind(reference) {
                Some(kind) => {
                    resolution.target.reference = reference.to_string();
                    resolution.kind = Some(kind);
                }
                None => resolution
                    .diagnostics
                    .push(RefDiagnostic::NoSuchRef(reference.to_string())),
            }

            if lookup.path_exists(Path::new(file)) {
                resolution.target.file = Some(PathBuf::from(file));
            } else {
                resolution
                    .diagnostics
                    .push(RefDiagnostic::NoSuchFile(file.to_string()));
            }
        }
    }

    resolution
}
