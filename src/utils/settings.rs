//! User settings.
//!
//! Settings are read from `$HOME/.gitpulse/settings.json`, or from the file
//! named by `GITPULSE_SETTINGS` when that variable is set. Command-line flags
//! take precedence over every value here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::git::LogFilter;

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "GITPULSE_SETTINGS";

/// Settings loaded from the user's settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Author identities used when no `--author` is given.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Keep merge commits by default.
    #[serde(default)]
    pub include_merges: bool,
    /// Rule catalogue replacing the embedded one.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Repositories analyzed when none are given on the command line.
    #[serde(default)]
    pub repos: Vec<PathBuf>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(SETTINGS_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".gitpulse").join("settings.json"))
    }

    /// Builds a log filter, preferring explicit authors over configured ones.
    pub fn log_filter(
        &self,
        authors: &[String],
        since: Option<String>,
        until: Option<String>,
        include_merges: bool,
    ) -> LogFilter {
        LogFilter {
            since,
            until,
            authors: if authors.is_empty() {
                self.authors.clone()
            } else {
                authors.to_vec()
            },
            include_merges: include_merges || self.include_merges,
        }
    }
}
