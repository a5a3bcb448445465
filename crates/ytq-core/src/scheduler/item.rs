//! Single-item pipeline: skip-if-exists, cancel check, yt-dlp run, outcome.

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::queue_db::{ItemId, ItemStatus, QueueDb};
use crate::video_id;
use crate::ytdlp::{DownloadEvent, YtDlpError};

use super::progress::ProgressEvent;
use super::DownloadContext;

/// Minimum interval between persisted progress updates for one item.
const PERSIST_INTERVAL: Duration = Duration::from_millis(250);

/// How a single item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Done,
    Skipped,
    Cancelled,
    Failed,
}

async fn report(
    ctx: &DownloadContext,
    item_id: ItemId,
    percent: f64,
    status: ItemStatus,
) -> Result<()> {
    ctx.db.update_progress(item_id, percent, status).await?;
    send_event(ctx, ProgressEvent::new(item_id, percent, status)).await;
    Ok(())
}

/// Status changes are delivered even when the printer lags behind.
async fn send_event(ctx: &DownloadContext, event: ProgressEvent) {
    if let Some(ref tx) = ctx.progress_tx {
        let _ = tx.send(event).await;
    }
}

async fn fail(ctx: &DownloadContext, item_id: ItemId, message: &str) -> Result<ItemOutcome> {
    tracing::warn!(item_id, "download failed: {}", message);
    ctx.db.update_progress(item_id, 0.0, ItemStatus::Error).await?;
    ctx.db
        .set_status(item_id, ItemStatus::Error, Some(message))
        .await?;
    let mut event = ProgressEvent::new(item_id, 0.0, ItemStatus::Error);
    event.detail = Some(message.to_string());
    send_event(ctx, event).await;
    Ok(ItemOutcome::Failed)
}

/// Receives yt-dlp events for one item, persists them (throttled) and
/// forwards them to the CLI. Spawn this with tokio::spawn.
async fn run_event_loop(
    mut rx: mpsc::Receiver<DownloadEvent>,
    db: QueueDb,
    item_id: ItemId,
    stats_tx: Option<mpsc::Sender<ProgressEvent>>,
) {
    let mut last_persist: Option<Instant> = None;
    while let Some(event) = rx.recv().await {
        let (percent, status) = match event {
            DownloadEvent::Progress { percent } => (percent, ItemStatus::Downloading),
            DownloadEvent::Finished => (100.0, ItemStatus::Postprocessing),
            DownloadEvent::Failed => (0.0, ItemStatus::Error),
            DownloadEvent::Output(_) => continue,
        };

        let due = last_persist.map_or(true, |t| t.elapsed() >= PERSIST_INTERVAL);
        if due || status != ItemStatus::Downloading {
            if db.update_progress(item_id, percent, status).await.is_err() {
                tracing::warn!(item_id, "progress update failed");
            }
            last_persist = Some(Instant::now());
        }
        if let Some(ref tx) = stats_tx {
            let event = ProgressEvent::new(item_id, percent, status);
            if status == ItemStatus::Downloading {
                let _ = tx.try_send(event);
            } else {
                let _ = tx.send(event).await;
            }
        }
    }
}

/// Download one item that is already claimed (or being retried).
///
/// Per-item failures are recorded on the item and reported as
/// `ItemOutcome::Failed`; only database errors are returned as `Err`.
pub async fn download_item(ctx: &DownloadContext, item_id: ItemId) -> Result<ItemOutcome> {
    let item = ctx
        .db
        .get_item(item_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("item {} not found", item_id))?;
    let dir = &ctx.download_dir;

    if let Some(existing) =
        video_id::find_existing_path(&item.url, dir, &ctx.options.audio_format)
    {
        tracing::info!(item_id, path = %existing.display(), "already downloaded");
        ctx.db
            .set_output_path(item_id, &existing.to_string_lossy())
            .await?;
        report(ctx, item_id, 100.0, ItemStatus::Skipped).await?;
        return Ok(ItemOutcome::Skipped);
    }

    if ctx.control.is_cancelled() {
        report(ctx, item_id, 0.0, ItemStatus::Cancelled).await?;
        return Ok(ItemOutcome::Cancelled);
    }

    if ctx.control.take_pending_abort(item_id) {
        tracing::info!(item_id, "cancelled before start");
        report(ctx, item_id, 0.0, ItemStatus::Cancelled).await?;
        return Ok(ItemOutcome::Cancelled);
    }

    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        let msg = format!("could not create {}: {}", dir.display(), e);
        return fail(ctx, item_id, &msg).await;
    }

    report(ctx, item_id, 0.0, ItemStatus::Downloading).await?;

    let abort = ctx.control.register(item_id);
    let (tx, rx) = mpsc::channel::<DownloadEvent>(64);
    let events = tokio::spawn(run_event_loop(
        rx,
        ctx.db.clone(),
        item_id,
        ctx.progress_tx.clone(),
    ));

    let started = Instant::now();
    let result = ctx
        .ytdlp
        .download(&item.url, dir, &ctx.options, &abort, Some(&tx))
        .await;
    drop(tx);
    ctx.control.unregister(item_id);
    events.await.context("progress task join")?;

    match result {
        Ok(outcome) => {
            if let Some(ref path) = outcome.path {
                ctx.db
                    .set_output_path(item_id, &path.to_string_lossy())
                    .await?;
            }
            report(ctx, item_id, 100.0, ItemStatus::Done).await?;
            tracing::info!(
                item_id,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "item {} done: {}",
                item_id,
                outcome
                    .path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(in archive)".to_string())
            );
            Ok(ItemOutcome::Done)
        }
        Err(YtDlpError::Cancelled) => {
            tracing::info!(item_id, "item cancelled");
            report(ctx, item_id, 0.0, ItemStatus::Cancelled).await?;
            Ok(ItemOutcome::Cancelled)
        }
        Err(e) => fail(ctx, item_id, &e.to_string()).await,
    }
}

/// Re-run a single item right away, regardless of its current status.
pub async fn retry_item(ctx: &DownloadContext, item_id: ItemId) -> Result<ItemOutcome> {
    if ctx.db.get_item(item_id).await?.is_none() {
        anyhow::bail!("item {} not found", item_id);
    }
    ctx.db.set_status(item_id, ItemStatus::Queued, None).await?;
    download_item(ctx, item_id).await
}
