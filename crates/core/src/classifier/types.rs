//! Event and state types for the classifier.

use serde::Serialize;

/// Progress through one playlist run. Lives only as long as the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunState {
    /// 1-based index of the item being fetched, 0 before the first announcement.
    pub current_item_index: u32,
    /// Item count reported by the downloader, 0 until known.
    pub total_items: u32,
}

/// Semantic reduction of one output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// An item fetch was announced (`complete == false`) or finished.
    Progress { complete: bool, index: u32, total: u32 },
    /// The archive ledger already lists this item.
    Skipped { item_id: String },
    /// The remote refused to serve this item.
    Unavailable { item_id: String, raw_line: String },
    /// Anything not recognised.
    Passthrough { raw_line: String },
}

impl StreamEvent {
    pub fn passthrough(line: &str) -> Self {
        Self::Passthrough {
            raw_line: line.to_string(),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough { .. })
    }
}
