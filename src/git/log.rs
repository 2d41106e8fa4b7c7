//! Log-fetch runner

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::git::LogFetchError;

/// Header template: object id, strict ISO author date, subject, author name, author email.
pub const LOG_FORMAT: &str = "--pretty=format:%H%n%aI%n%s%n%an%n%ae";

/// Filters applied when collecting history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Only commits after this date (any format git accepts for `--since`)
    #[serde(default)]
    pub since: Option<String>,
    /// Only commits before this date (any format git accepts for `--until`)
    #[serde(default)]
    pub until: Option<String>,
    /// Author identities; a commit matching any of them is kept
    #[serde(default)]
    pub authors: Vec<String>,
    /// Keep merge commits
    #[serde(default)]
    pub include_merges: bool,
}

/// Source of raw `git log --numstat` text for a repository
pub trait LogSource {
    /// Returns the raw log text for `repo`, or an error if it could not be collected.
    fn fetch_log(&self, repo: &Path, filter: &LogFilter) -> Result<String, LogFetchError>;
}

/// Collects history by running the git executable
#[derive(Debug, Clone)]
pub struct GitLogRunner {
    program: String,
}

impl Default for GitLogRunner {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitLogRunner {
    /// Creates a runner using `git` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner using a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Builds the argument list for `git log`.
    pub fn build_args(repo: &Path, filter: &LogFilter) -> Vec<String> {
        // Paths are printed verbatim and without `{old => new}` rename notation.
        let mut args = vec![
            "-C".to_string(),
            repo.display().to_string(),
            "-c".to_string(),
            "core.quotePath=false".to_string(),
            "log".to_string(),
            "--numstat".to_string(),
            "--no-renames".to_string(),
            LOG_FORMAT.to_string(),
        ];

        if let Some(since) = &filter.since {
            args.push(format!("--since={since}"));
        }
        if let Some(until) = &filter.until {
            args.push(format!("--until={until}"));
        }
        for author in &filter.authors {
            args.push(format!("--author={author}"));
        }
        if !filter.include_merges {
            args.push("--no-merges".to_string());
        }

        args
    }
}

impl LogSource for GitLogRunner {
    fn fetch_log(&self, repo: &Path, filter: &LogFilter) -> Result<String, LogFetchError> {
        let args = Self::build_args(repo, filter);
        debug!(program = %self.program, ?args, "Running git log");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| LogFetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LogFetchError::CommandFailed {
                repo: repo.display().to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(repo = %repo.display(), bytes = text.len(), "Fetched git log");
        Ok(text)
    }
}
