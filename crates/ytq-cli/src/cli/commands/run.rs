//! `ytq run` – queue every item and download them with a worker pool.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use ytq_core::config::YtqConfig;
use ytq_core::control::{self, JobControl};
use ytq_core::desktop;
use ytq_core::queue_db::{ItemId, ItemStatus, QueueDb};
use ytq_core::scheduler::{self, DownloadContext, ProgressEvent, RunSummary};

use crate::cli::control_socket;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Per-item progress as seen by the printer; the overall figure is the mean.
pub(crate) struct ProgressBoard {
    percent: HashMap<ItemId, f64>,
    last_status: HashMap<ItemId, ItemStatus>,
    last_print: HashMap<ItemId, Instant>,
}

impl ProgressBoard {
    pub(crate) fn new(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            percent: ids.into_iter().map(|id| (id, 0.0)).collect(),
            last_status: HashMap::new(),
            last_print: HashMap::new(),
        }
    }

    pub(crate) fn overall(&self) -> f64 {
        if self.percent.is_empty() {
            return 0.0;
        }
        self.percent.values().sum::<f64>() / self.percent.len() as f64
    }

    /// Apply an event; returns the line to print, or None when throttled.
    pub(crate) fn apply(&mut self, ev: &ProgressEvent, now: Instant) -> Option<String> {
        self.percent.insert(ev.item_id, ev.percent);
        let changed = self.last_status.insert(ev.item_id, ev.status) != Some(ev.status)
            || ev.detail.is_some();
        let due = self
            .last_print
            .get(&ev.item_id)
            .map_or(true, |t| now.duration_since(*t) >= PROGRESS_INTERVAL);
        if !changed && !due {
            return None;
        }
        self.last_print.insert(ev.item_id, now);
        let status = match ev.detail.as_deref() {
            Some(detail) => format!("{}: {}", ev.status, detail),
            None => ev.status.to_string(),
        };
        Some(format!(
            "  [{:>5.1}%] #{:<5} {:>5.1}%  {}",
            self.overall(),
            ev.item_id,
            ev.percent,
            status
        ))
    }
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Done: {} downloaded, {} skipped, {} failed, {} cancelled",
        summary.done, summary.skipped, summary.failed, summary.cancelled
    );
}

pub async fn run_downloads(
    db: &QueueDb,
    cfg: &YtqConfig,
    jobs: Option<usize>,
    dir: Option<&Path>,
) -> Result<()> {
    let socket_path = control::default_control_socket_path().ok();
    if let Some(ref path) = socket_path {
        if control_socket::is_active(path).await {
            anyhow::bail!("another `ytq run` is already active; use `ytq cancel` to stop it");
        }
    }

    let items = db.list_items().await?;
    if items.is_empty() {
        println!("No items in queue. Add at least one link.");
        return Ok(());
    }

    let download_dir = cfg.resolve_download_dir(dir)?;
    let queued = db.queue_all().await?;
    let workers = jobs.unwrap_or(cfg.max_workers).max(1);
    println!(
        "Starting downloads: {} item(s) into {} ({} at a time)",
        queued,
        download_dir.display(),
        workers
    );

    let job_control = Arc::new(JobControl::new());
    let listener = socket_path.as_ref().and_then(|path| {
        match control_socket::spawn_control_listener(Arc::clone(&job_control), path) {
            Ok(handle) => {
                tracing::debug!(path = %path.display(), "control socket listening");
                Some(handle)
            }
            Err(e) => {
                tracing::warn!("control socket unavailable: {}", e);
                None
            }
        }
    });

    let ctrl_c = tokio::spawn({
        let job_control = Arc::clone(&job_control);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("Cancelling...");
                job_control.cancel_all();
            }
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressEvent>(64);
    let mut board = ProgressBoard::new(items.iter().map(|i| i.id));
    let progress_handle = tokio::spawn(async move {
        while let Some(ev) = progress_rx.recv().await {
            if let Some(line) = board.apply(&ev, Instant::now()) {
                println!("{line}");
            }
        }
    });

    let ctx = DownloadContext::new(db.clone(), cfg, download_dir)
        .with_control(Arc::clone(&job_control))
        .with_progress(progress_tx);
    let result = scheduler::run_queue(&ctx, workers).await;
    drop(ctx);
    let _ = progress_handle.await;

    ctrl_c.abort();
    if let Some(handle) = listener {
        handle.abort();
    }
    if let Some(ref path) = socket_path {
        let _ = std::fs::remove_file(path);
    }

    let summary = result?;
    tracing::info!("run finished: {:?}", summary);
    print_summary(&summary);
    if cfg.notify {
        desktop::notify_complete().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(item_id: ItemId, percent: f64, status: ItemStatus) -> ProgressEvent {
        ProgressEvent::new(item_id, percent, status)
    }

    #[test]
    fn overall_is_mean_over_all_items() {
        let mut board = ProgressBoard::new([1, 2, 3, 4]);
        let now = Instant::now();
        board.apply(&ev(1, 100.0, ItemStatus::Done), now);
        board.apply(&ev(2, 50.0, ItemStatus::Downloading), now);
        assert!((board.overall() - 37.5).abs() < 1e-9);
        assert_eq!(ProgressBoard::new([]).overall(), 0.0);
    }

    #[test]
    fn error_line_carries_detail() {
        let mut board = ProgressBoard::new([2]);
        let now = Instant::now();
        assert!(board.apply(&ev(2, 0.0, ItemStatus::Error), now).is_some());
        let mut failed = ev(2, 0.0, ItemStatus::Error);
        failed.detail = Some("Video unavailable".to_string());
        let line = board.apply(&failed, now).unwrap();
        assert!(line.ends_with("error: Video unavailable"), "{line}");
    }

    #[test]
    fn same_status_updates_are_throttled() {
        let mut board = ProgressBoard::new([1]);
        let t0 = Instant::now();
        assert!(board
            .apply(&ev(1, 10.0, ItemStatus::Downloading), t0)
            .is_some());
        assert!(board
            .apply(&ev(1, 11.0, ItemStatus::Downloading), t0 + Duration::from_millis(100))
            .is_none());
        // A status change is always printed.
        let line = board
            .apply(&ev(1, 100.0, ItemStatus::Postprocessing), t0 + Duration::from_millis(150))
            .unwrap();
        assert!(line.contains("postprocessing"));
        assert!(board
            .apply(&ev(1, 100.0, ItemStatus::Postprocessing), t0 + Duration::from_secs(1))
            .is_some());
    }
}
