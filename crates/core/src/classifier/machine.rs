//! Line-at-a-time classification state machine.

use tracing::debug;

use super::patterns::OutputPatterns;
use super::types::{RunState, StreamEvent};

/// Reduces downloader output lines to [`StreamEvent`]s.
///
/// One classifier is created per playlist run; its [`RunState`] starts at
/// `(0, 0)` and is only advanced by item announcements.
#[derive(Debug, Clone)]
pub struct StreamClassifier {
    patterns: OutputPatterns,
    state: RunState,
}

impl StreamClassifier {
    pub fn new(patterns: OutputPatterns) -> Self {
        Self {
            patterns,
            state: RunState::default(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Classifies one raw output line. Never fails; unrecognised or malformed
    /// lines come back as [`StreamEvent::Passthrough`].
    pub fn classify(&mut self, line: &str) -> StreamEvent {
        let trimmed = line.trim();
        let tokens: Vec<&str> = trimmed.split(' ').collect();

        if let Some(event) = self.classify_progress(&tokens) {
            return event;
        }
        if let Some(event) = self.classify_error(&tokens, trimmed) {
            return event;
        }
        if let Some(event) = self.classify_archive_hit(&tokens) {
            return event;
        }

        StreamEvent::passthrough(trimmed)
    }

    fn classify_progress(&mut self, tokens: &[&str]) -> Option<StreamEvent> {
        if tokens.first() != Some(&self.patterns.progress_tag.as_str()) {
            return None;
        }

        let second = tokens.get(1)?;
        if self.patterns.is_completion(second) {
            return Some(StreamEvent::Progress {
                complete: true,
                index: self.state.current_item_index,
                total: self.state.total_items,
            });
        }

        let third = tokens.get(2)?;
        if !self.patterns.is_announcement(second, third) {
            return None;
        }

        let index = parse_position(tokens, self.patterns.announcement_index_position)?;
        let total = parse_position(tokens, self.patterns.announcement_total_position)?;

        if index < self.state.current_item_index {
            debug!(
                "Ignoring out-of-order announcement {} of {} (current item {})",
                index, total, self.state.current_item_index
            );
            return None;
        }

        self.state = RunState {
            current_item_index: index,
            total_items: total,
        };

        Some(StreamEvent::Progress {
            complete: false,
            index,
            total,
        })
    }

    fn classify_error(&self, tokens: &[&str], line: &str) -> Option<StreamEvent> {
        if tokens.first() != Some(&self.patterns.error_tag.as_str()) {
            return None;
        }

        let item_id = tokens
            .get(self.patterns.error_id_position)?
            .strip_suffix(':')
            .filter(|id| !id.is_empty())?;

        Some(StreamEvent::Unavailable {
            item_id: item_id.to_string(),
            raw_line: line.to_string(),
        })
    }

    fn classify_archive_hit(&self, tokens: &[&str]) -> Option<StreamEvent> {
        // A single-token line would otherwise read its own marker as the id
        if tokens.len() < 2 || tokens.last() != Some(&self.patterns.archive_marker.as_str()) {
            return None;
        }

        let raw = tokens.get(self.patterns.archive_id_position)?;
        let item_id = raw.strip_suffix(':').unwrap_or(raw);
        if item_id.is_empty() {
            return None;
        }

        Some(StreamEvent::Skipped {
            item_id: item_id.to_string(),
        })
    }
}

fn parse_position(tokens: &[&str], position: usize) -> Option<u32> {
    tokens.get(position)?.parse().ok()
}
