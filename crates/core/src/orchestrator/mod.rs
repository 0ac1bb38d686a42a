//! Playlist synchronization orchestrator.
//!
//! Drives every playlist through the same sequence, strictly one at a time:
//!
//! `Preflight -> EnsureDirectory -> BuildInvocation -> RunAndClassify -> next`
//!
//! Configuration defects (bad name, unknown kind) abort the whole run. Anything
//! that goes wrong inside one playlist's run is logged and recorded in its
//! [`PlaylistReport`]; the next playlist still runs.

mod runner;
mod types;

pub use runner::Orchestrator;
pub use types::{PlaylistOutcome, PlaylistReport, RunSummary, SyncError};
