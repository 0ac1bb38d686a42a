//! Types for the playlist orchestrator.

use serde::Serialize;
use thiserror::Error;

use crate::invocation::InvocationError;
use crate::playlist::PlaylistError;

/// Configuration-class errors. Returning one aborts the entire run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid playlist descriptor.
    #[error("{0}")]
    Playlist(#[from] PlaylistError),

    /// Invocation could not be built.
    #[error("{0}")]
    Invocation(#[from] InvocationError),
}

/// How one playlist run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaylistOutcome {
    /// The downloader ran to completion. A non-zero code is a warning only.
    Completed { exit_code: Option<i32> },
    /// The watchdog killed the downloader.
    TimedOut { timeout_secs: u64 },
    /// The playlist could not be run at all (directory or spawn failure).
    Failed { reason: String },
}

/// What happened during one playlist run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistReport {
    pub name: String,
    pub outcome: PlaylistOutcome,
    /// Whether the playlist directory had to be created.
    pub directory_created: bool,
    /// Item count last reported by the downloader.
    pub total_items: u32,
    /// Item fetches announced.
    pub announced: u32,
    /// Items that reached 100%.
    pub completed: u32,
    /// Items skipped because the archive already lists them.
    pub skipped: u32,
    /// Items the remote refused to serve.
    pub unavailable: u32,
    /// Marker files created for unavailable items.
    pub markers_written: u32,
    #[serde(skip)]
    last_completed: Option<u32>,
}

impl PlaylistReport {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: PlaylistOutcome::Completed { exit_code: None },
            directory_created: false,
            total_items: 0,
            announced: 0,
            completed: 0,
            skipped: 0,
            unavailable: 0,
            markers_written: 0,
            last_completed: None,
        }
    }

    /// Counts a completion once per item; merged formats report 100% twice.
    pub(crate) fn record_completion(&mut self, index: u32) {
        if self.last_completed != Some(index) {
            self.completed += 1;
            self.last_completed = Some(index);
        }
    }

    pub(crate) fn failed(mut self, reason: impl Into<String>) -> Self {
        self.outcome = PlaylistOutcome::Failed {
            reason: reason.into(),
        };
        self
    }

    pub fn is_clean(&self) -> bool {
        self.outcome == PlaylistOutcome::Completed { exit_code: Some(0) }
    }
}

/// Reports for every playlist in a run, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub playlists: Vec<PlaylistReport>,
}

impl RunSummary {
    /// Playlists whose downloader exited 0.
    pub fn clean_count(&self) -> usize {
        self.playlists.iter().filter(|p| p.is_clean()).count()
    }

    /// Playlists that could not be run or timed out.
    pub fn failed_count(&self) -> usize {
        self.playlists
            .iter()
            .filter(|p| !matches!(p.outcome, PlaylistOutcome::Completed { .. }))
            .count()
    }

    pub fn markers_written(&self) -> u32 {
        self.playlists.iter().map(|p| p.markers_written).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_counted_once_per_item() {
        let mut report = PlaylistReport::new("Mix");
        report.record_completion(1);
        report.record_completion(1);
        report.record_completion(2);
        assert_eq!(report.completed, 2);
    }

    #[test]
    fn test_summary_counts() {
        let mut clean = PlaylistReport::new("a");
        clean.outcome = PlaylistOutcome::Completed { exit_code: Some(0) };
        clean.markers_written = 2;

        let mut warned = PlaylistReport::new("b");
        warned.outcome = PlaylistOutcome::Completed { exit_code: Some(1) };
        warned.markers_written = 1;

        let failed = PlaylistReport::new("c").failed("no directory");

        let summary = RunSummary {
            playlists: vec![clean, warned, failed],
        };
        assert_eq!(summary.clean_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.markers_written(), 3);
    }

    #[test]
    fn test_report_serialization() {
        let report = PlaylistReport::new("Mix").failed("boom");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["reason"], "boom");
        assert!(json.get("last_completed").is_none());
    }
}
