//! Trait definitions for the runner module.

use async_trait::async_trait;

use crate::invocation::Invocation;

use super::error::RunnerError;
use super::types::ProcessRun;

/// Something that can start the downloader.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Starts exactly one child process for `invocation`.
    ///
    /// Returns once the process is running; its output is read through the
    /// returned [`ProcessRun`].
    async fn start(&self, invocation: &Invocation) -> Result<ProcessRun, RunnerError>;
}
