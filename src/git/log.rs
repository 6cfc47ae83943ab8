//! git::log
//!
//! Formatted history via the `git log` binary.
//!
//! The format joins fields with the unit separator (`%x1f`). After capture,
//! spaces in every field but the trailing ref decoration are replaced with
//! the same separator, producing the line shape decoded by
//! [`crate::core::record`].

use std::path::Path;
use std::process::Command;

use super::GitError;
use crate::core::classify::LogQuery;
use crate::core::record::encode_raw_line;

/// `git log --format` string: id, date, author, signer, status, subject, refs.
const LOG_FORMAT: &str = "%h%x1f%ad%x1f%an%x1f[%GS]%x1f[%G?]%x1f%s%x1f(%D)";

/// Build the `git log` argument list for `query`.
pub(crate) fn log_args(query: &LogQuery) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        "--graph".to_string(),
        "--color=never".to_string(),
        "--no-show-signature".to_string(),
        "--date=short".to_string(),
        format!("--format={}", LOG_FORMAT),
        format!("--max-count={}", query.limit),
        query.range(),
        "--".to_string(),
    ];
    if let Some(file) = &query.file {
        args.push(file.to_string_lossy().into_owned());
    }
    args
}

/// Run `git log` in `cwd` and return the encoded history stream.
pub(crate) fn run(cwd: &Path, query: &LogQuery) -> Result<String, GitError> {
    if query.limit == 0 {
        return Ok(String::new());
    }

    let output = Command::new("git")
        .args(log_args(query))
        .current_dir(cwd)
        .output()
        .map_err(|e| GitError::Spawn {
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(GitError::LogFailed {
            range: query.range(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .map(encode_raw_line)
        .collect::<Vec<_>>()
        .join("\n"))
}
