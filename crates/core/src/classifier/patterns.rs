//! Token table describing the downloader's output wording.

use serde::{Deserialize, Serialize};

/// Marker strings and token positions the classifier matches against.
///
/// Positions are zero-based indexes into the line after trimming and splitting
/// on single spaces. Defaults follow current yt-dlp output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputPatterns {
    /// First token of progress lines.
    pub progress_tag: String,
    /// Second tokens that mean an item finished downloading.
    pub completion_markers: Vec<String>,
    /// Second token of an item announcement.
    pub announcement_verb: String,
    /// Accepted third tokens of an item announcement.
    pub announcement_nouns: Vec<String>,
    /// Position of `N` in "Downloading item N of M".
    pub announcement_index_position: usize,
    /// Position of `M` in "Downloading item N of M".
    pub announcement_total_position: usize,
    /// First token of error lines.
    pub error_tag: String,
    /// Position of the colon-terminated item id in error lines.
    pub error_id_position: usize,
    /// Last token of archive-hit lines.
    pub archive_marker: String,
    /// Position of the item id in archive-hit lines.
    pub archive_id_position: usize,
}

impl Default for OutputPatterns {
    fn default() -> Self {
        Self {
            progress_tag: "[download]".to_string(),
            completion_markers: vec!["100%".to_string(), "100.0%".to_string()],
            announcement_verb: "Downloading".to_string(),
            announcement_nouns: vec!["item".to_string(), "video".to_string()],
            announcement_index_position: 3,
            announcement_total_position: 5,
            error_tag: "ERROR:".to_string(),
            error_id_position: 2,
            archive_marker: "archive".to_string(),
            archive_id_position: 1,
        }
    }
}

impl OutputPatterns {
    pub(crate) fn is_completion(&self, token: &str) -> bool {
        self.completion_markers.iter().any(|m| m == token)
    }

    pub(crate) fn is_announcement(&self, verb: &str, noun: &str) -> bool {
        verb == self.announcement_verb && self.announcement_nouns.iter().any(|n| n == noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let patterns: OutputPatterns = toml::from_str(
            r#"
error_tag = "FEHLER:"
announcement_nouns = ["Element"]
"#,
        )
        .unwrap();
        assert_eq!(patterns.error_tag, "FEHLER:");
        assert_eq!(patterns.announcement_nouns, vec!["Element".to_string()]);
        assert_eq!(patterns.progress_tag, "[download]");
        assert_eq!(patterns.archive_id_position, 1);
    }

    #[test]
    fn test_matchers() {
        let patterns = OutputPatterns::default();
        assert!(patterns.is_completion("100%"));
        assert!(patterns.is_completion("100.0%"));
        assert!(!patterns.is_completion("99.9%"));
        assert!(patterns.is_announcement("Downloading", "item"));
        assert!(patterns.is_announcement("Downloading", "video"));
        assert!(!patterns.is_announcement("Downloading", "webpage"));
    }
}
