//! Testing utilities for driving the orchestrator without a real downloader.
//!
//! # Example
//!
//! ```rust,ignore
//! use tubemirror_core::testing::{fixtures, ScriptedRun, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new();
//! runner.push_run(ScriptedRun::exits(0, [fixtures::archive_hit("abc123")])).await;
//! ```

mod scripted_runner;

pub use scripted_runner::{ScriptedExit, ScriptedRun, ScriptedRunner};

/// Downloader output lines in current yt-dlp wording.
pub mod fixtures {
    /// `[download] Downloading item N of M`
    pub fn announcement(index: u32, total: u32) -> String {
        format!("[download] Downloading item {} of {}", index, total)
    }

    /// A 100% progress line.
    pub fn completion() -> String {
        "[download] 100% of    4.20MiB in 00:00:02 at 1.91MiB/s".to_string()
    }

    /// A partial progress line.
    pub fn partial_progress(percent: f32) -> String {
        format!(
            "[download] {:5.1}% of    4.20MiB at    1.91MiB/s ETA 00:01",
            percent
        )
    }

    /// An error line for an item the remote refuses to serve.
    pub fn unavailable(item_id: &str) -> String {
        format!(
            "ERROR: [youtube] {}: Video unavailable. This video is private",
            item_id
        )
    }

    /// An archive-hit line.
    pub fn archive_hit(item_id: &str) -> String {
        format!(
            "[download] {}: has already been recorded in the archive",
            item_id
        )
    }

    /// Extractor chatter the classifier ignores.
    pub fn extractor_noise(item_id: &str) -> String {
        format!("[youtube] Extracting URL: https://www.youtube.com/watch?v={}", item_id)
    }
}
