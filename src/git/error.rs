//! Log-fetch error handling.

use thiserror::Error;

/// Errors raised when collecting history from a repository.
#[derive(Error, Debug)]
pub enum LogFetchError {
    /// The git executable could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// git ran but reported a failure.
    #[error("git log failed in {repo} (exit code {code:?}): {stderr}")]
    CommandFailed {
        /// Repository the command ran against.
        repo: String,
        /// Process exit code, if any.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },
}
