//! Error types for the marker module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a marker. Never fatal to a run.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// Marker file could not be created or written.
    #[error("Failed to write marker: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Shortcut could not be made executable.
    #[error("Failed to set permissions on marker: {path}")]
    PermissionsFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
