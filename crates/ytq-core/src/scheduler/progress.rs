//! Progress reporting from workers to the CLI.

use crate::queue_db::{ItemId, ItemStatus};

use super::item::ItemOutcome;

/// Snapshot of one item's progress (CLI-friendly).
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub item_id: ItemId,
    /// Percent in [0, 100].
    pub percent: f64,
    pub status: ItemStatus,
    /// Error message for `error` events.
    pub detail: Option<String>,
}

impl ProgressEvent {
    pub fn new(item_id: ItemId, percent: f64, status: ItemStatus) -> Self {
        Self {
            item_id,
            percent,
            status,
            detail: None,
        }
    }
}

/// Outcome counts of one `run_queue` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub done: u32,
    pub skipped: u32,
    pub cancelled: u32,
    pub failed: u32,
}

impl RunSummary {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Done => self.done += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Cancelled => self.cancelled += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.done + self.skipped + self.cancelled + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let mut s = RunSummary::default();
        for o in [
            ItemOutcome::Done,
            ItemOutcome::Done,
            ItemOutcome::Skipped,
            ItemOutcome::Failed,
            ItemOutcome::Cancelled,
        ] {
            s.record(o);
        }
        assert_eq!(s.done, 2);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.failed, 1);
        assert_eq!(s.cancelled, 1);
        assert_eq!(s.total(), 5);
    }
}
