//! Error types for the invocation module.

use thiserror::Error;

/// Errors that can occur while building an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The playlist kind has no argument set. Indicates a corrupt registry.
    #[error("Invalid playlist type '{kind}' provided for '{name}'. Options are 'video' or 'audio'")]
    UnknownKind { name: String, kind: String },
}
