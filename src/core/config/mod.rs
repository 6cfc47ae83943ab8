//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! synclog has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$SYNCLOG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/synclog/config.toml`
//! 3. `~/.synclog/config.toml`
//!
//! # Repo Config Location
//!
//! `.git/synclog/config.toml` under the repository's git directory.
//!
//! # Example
//!
//! ```no_run
//! use synclog::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("Budget: {}", config.count());
//! println!("Color: {}", config.color());
//! ```

pub mod schema;

pub use schema::{ColorTable, ConfigFile};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ui::palette::Palette;

/// Budget used when neither config nor flags set one.
pub const DEFAULT_COUNT: usize = 12;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Repository configuration (if present)
    pub repo: Option<ConfigFile>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads the repository config.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values. Missing files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global_path = Self::find_global();
        let repo_path = git_dir
            .map(Self::repo_config_path)
            .filter(|p| p.exists());

        Self::from_paths(global_path.as_deref(), repo_path.as_deref())
    }

    /// Load configuration from explicit file paths.
    pub fn from_paths(global: Option<&Path>, repo: Option<&Path>) -> Result<Self, ConfigError> {
        let global_file = match global {
            Some(path) => Self::read_config(path)?,
            None => ConfigFile::default(),
        };
        let repo_file = repo.map(Self::read_config).transpose()?;

        global_file.validate()?;
        if let Some(ref r) = repo_file {
            r.validate()?;
        }

        Ok(Config {
            global: global_file,
            repo: repo_file,
            global_path: global.map(Path::to_path_buf),
            repo_path: repo.map(Path::to_path_buf),
        })
    }

    /// Locate the global config file, if one exists.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $SYNCLOG_CONFIG
        if let Ok(path) = std::env::var("SYNCLOG_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/synclog/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("synclog/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.synclog/config.toml
        dirs::home_dir()
            .map(|home| home.join(".synclog/config.toml"))
            .filter(|p| p.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for repo config.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("synclog/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Pick the repo value, falling back to the global one.
    fn pick<T>(&self, get: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.repo.as_ref().and_then(&get).or_else(|| get(&self.global))
    }

    /// Default commit budget.
    ///
    /// Defaults to [`DEFAULT_COUNT`].
    pub fn count(&self) -> usize {
        self.pick(|c| c.count).unwrap_or(DEFAULT_COUNT)
    }

    /// Whether color output is enabled.
    ///
    /// Defaults to `true`.
    pub fn color(&self) -> bool {
        self.pick(|c| c.color).unwrap_or(true)
    }

    /// Whether the merged section is hidden.
    ///
    /// Defaults to `false`.
    pub fn hide_merged(&self) -> bool {
        self.pick(|c| c.hide_merged).unwrap_or(false)
    }

    /// Whether the graph prefix is shown.
    ///
    /// Defaults to `false`.
    pub fn graph(&self) -> bool {
        self.pick(|c| c.graph).unwrap_or(false)
    }

    /// Build the palette from configured field colors.
    ///
    /// Field colors were validated at load time.
    pub fn palette(&self, enabled: bool) -> Palette {
        let mut palette = Palette {
            enabled,
            ..Palette::default()
        };

        for field in schema::ALL_FIELDS {
            let color = self.pick(|c| {
                c.colors
                    .as_ref()
                    .and_then(|t| t.color(field).ok().flatten())
            });
            if let Some(color) = color {
                palette.set_field(field, color);
            }
        }

        palette
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
