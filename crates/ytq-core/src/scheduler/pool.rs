//! Worker pool: keep up to `max_workers` yt-dlp downloads in flight.
//!
//! Workers claim queued items atomically from the DB; when one finishes the
//! next queued item is started until the queue is empty or the run is cancelled.

use anyhow::Result;

use super::item::download_item;
use super::progress::RunSummary;
use super::DownloadContext;

/// Runs every queued item with at most `max_workers` downloads at once.
pub async fn run_queue(ctx: &DownloadContext, max_workers: usize) -> Result<RunSummary> {
    let max_workers = max_workers.max(1);
    let mut summary = RunSummary::default();
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < max_workers && !ctx.control.is_cancelled() {
            let Some(item_id) = ctx.db.claim_next_queued().await? else {
                break;
            };
            let ctx = ctx.clone();
            join_set.spawn(async move { download_item(&ctx, item_id).await });
        }

        if join_set.is_empty() {
            break;
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        let outcome = res.map_err(|e| anyhow::anyhow!("worker task join: {}", e))??;
        summary.record(outcome);
    }

    if ctx.control.is_cancelled() {
        let n = ctx.db.cancel_queued().await?;
        summary.cancelled += n as u32;
        if n > 0 {
            tracing::info!("cancelled {} queued item(s)", n);
        }
    }

    Ok(summary)
}
