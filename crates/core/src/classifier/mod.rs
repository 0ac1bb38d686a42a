//! Stream event classifier for downloader output.
//!
//! yt-dlp has no structured progress protocol worth relying on here, so the
//! classifier reduces its human-readable output to a handful of events, one line
//! at a time:
//!
//! 1. Progress: `[download] Downloading item 3 of 10` and `[download] 100% of ...`
//! 2. Unavailable: `ERROR: [youtube] abc123: Video unavailable`
//! 3. Skipped: `[download] abc123: has already been recorded in the archive`
//! 4. Passthrough: everything else, including lines that look like one of the
//!    above but fail extraction
//!
//! Every token position and marker string lives in [`OutputPatterns`] so that a
//! wording change upstream is a configuration change.

mod machine;
mod patterns;
mod types;

pub use machine::StreamClassifier;
pub use patterns::OutputPatterns;
pub use types::{RunState, StreamEvent};
