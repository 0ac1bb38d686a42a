//! Error types for the runner module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the downloader.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Downloader binary not found.
    #[error("Downloader not found at path: {path}")]
    BinaryNotFound { path: PathBuf },

    /// The child process could not be started.
    #[error("Failed to start {path}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run exceeded the configured watchdog and was killed.
    #[error("Downloader timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The supervisor went away without reporting an exit status.
    #[error("Downloader supervisor exited without a status")]
    Abandoned,

    /// I/O error while waiting for the child.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
