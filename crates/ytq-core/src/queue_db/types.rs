//! Types used by the queue database.

use std::fmt;

/// Queue item identifier; also defines queue order.
pub type ItemId = i64;

/// Per-item status stored as a string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Added but never scheduled.
    Pending,
    Queued,
    Downloading,
    /// yt-dlp finished the transfer and is extracting audio.
    Postprocessing,
    Done,
    /// The audio file was already on disk; nothing was downloaded.
    Skipped,
    Cancelled,
    Error,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Queued => "queued",
            ItemStatus::Downloading => "downloading",
            ItemStatus::Postprocessing => "postprocessing",
            ItemStatus::Done => "done",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Cancelled => "cancelled",
            ItemStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => ItemStatus::Pending,
            "queued" => ItemStatus::Queued,
            "downloading" => ItemStatus::Downloading,
            "postprocessing" => ItemStatus::Postprocessing,
            "done" => ItemStatus::Done,
            "skipped" => ItemStatus::Skipped,
            "cancelled" => ItemStatus::Cancelled,
            _ => ItemStatus::Error,
        }
    }

    /// True once the item will not change again without user action.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ItemStatus::Done | ItemStatus::Skipped | ItemStatus::Cancelled | ItemStatus::Error
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full queue row.
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub id: ItemId,
    pub url: String,
    pub title: Option<String>,
    /// Percent in [0, 100].
    pub progress: f64,
    pub status: ItemStatus,
    /// Error message when `status` is `Error`.
    pub detail: Option<String>,
    pub output_path: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl QueueItem {
    /// Title as shown to the user; unresolved items read "Resolving...".
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Resolving...")
    }

    /// Status as shown to the user, e.g. `skipped (exists)` or `error: <detail>`.
    pub fn display_status(&self) -> String {
        match (self.status, self.detail.as_deref()) {
            (ItemStatus::Skipped, _) => "skipped (exists)".to_string(),
            (ItemStatus::Error, Some(detail)) => format!("error: {detail}"),
            (status, _) => status.as_str().to_string(),
        }
    }
}
