//! core::config
//!
//! Configuration schema and loading.
//!
//! # Scopes
//!
//! - **Global**: user-level settings
//! - **Repo**: repository-level overrides
//!
//! # Precedence
//!
//! Values resolve in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (handled by the CLI layer, not here)
//!
//! # Locations
//!
//! Global, searched in order:
//! 1. `$DRIFT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/drift/config.toml`
//! 3. `~/.drift/config.toml`
//!
//! Repo: `.git/drift/config.toml`.
//!
//! Missing files are fine; a file that exists but fails to parse is a hard
//! error with the offending path in the message.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

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
}

/// Settings shared by both scopes. Every field is optional so that absence
/// falls through to the next precedence level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Refresh remote metadata before resolving remote-looking refs.
    pub auto_fetch: Option<bool>,

    /// How many recent merge commits the flow heuristic scans.
    pub merge_scan_limit: Option<usize>,

    /// Colorize console output.
    pub color: Option<bool>,
}

impl Settings {
    /// Load settings from a TOML file, or `None` if the file is absent.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Resolved configuration with precedence applied on access.
#[derive(Debug, Clone, Default)]
pub struct Config {
    global: Settings,
    repo: Settings,
}

impl Config {
    /// Load configuration, layering the repo scope (if a git dir is known)
    /// over the global scope.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global = match global_config_path() {
            Some(path) => Settings::load_from(&path)?.unwrap_or_default(),
            None => Settings::default(),
        };

        let repo = match git_dir {
            Some(dir) => {
                Settings::load_from(&dir.join("drift").join("config.toml"))?.unwrap_or_default()
            }
            None => Settings::default(),
        };

        Ok(Self::from_parts(global, repo))
    }

    /// Assemble a config from already-loaded scopes.
    pub fn from_parts(global: Settings, repo: Settings) -> Self {
        Self { global, repo }
    }

    /// Whether to refresh remotes before resolving remote-looking refs.
    /// Default: true.
    pub fn auto_fetch(&self) -> bool {
        self.repo
            .auto_fetch
            .or(self.global.auto_fetch)
            .unwrap_or(true)
    }

    /// How many recent merges the flow heuristic scans. Default: 10.
    pub fn merge_scan_limit(&self) -> usize {
        self.repo
            .merge_scan_limit
            .or(self.global.merge_scan_limit)
            .unwrap_or(10)
    }

    /// Whether console output is colorized. Default: true.
    pub fn color(&self) -> bool {
        self.repo.color.or(self.global.color).unwrap_or(true)
    }
}

/// The global config file location, honoring `$DRIFT_CONFIG` and XDG.
fn global_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DRIFT_CONFIG") {
        return Some(PathBuf::from(path));
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("drift").join("config.toml"));
    }
    dirs::home_dir().map(|home| home.join(".drift").join("config.toml"))
}
