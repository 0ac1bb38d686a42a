//! Process runner for the external downloader.
//!
//! Starts one child process per call and exposes its merged stdout/stderr as a
//! forward-only sequence of lines followed by an exit report. Both streams are
//! wired to one OS pipe, which a blocking reader forwards into a bounded
//! channel. A supervisor task waits for the pipe to close before reaping the
//! child, and kills its whole process group when the watchdog expires.

mod command;
mod error;
mod traits;
mod types;

pub use command::CommandRunner;
pub use error::RunnerError;
pub use traits::ProcessRunner;
pub use types::{ExitReport, ProcessRun, RunOutput};
