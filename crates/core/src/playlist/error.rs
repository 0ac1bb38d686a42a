//! Error types for playlist descriptors.

use thiserror::Error;

/// Configuration defects in a playlist descriptor.
///
/// Both variants are fatal for the entire run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    /// The name cannot be used as a directory name.
    #[error("Invalid playlist name: '{name}' contains illegal characters: {reserved}")]
    InvalidName { name: String, reserved: String },

    /// The kind is neither `video` nor `audio`.
    #[error("Invalid playlist type '{kind}' for '{name}'. Options are 'video' or 'audio'")]
    UnknownKind { name: String, kind: String },
}
