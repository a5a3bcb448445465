//! `ytq retry <id>` – download one item again right now.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use ytq_core::config::YtqConfig;
use ytq_core::control::JobControl;
use ytq_core::queue_db::QueueDb;
use ytq_core::scheduler::{self, DownloadContext, ItemOutcome};

pub async fn run_retry(db: &QueueDb, cfg: &YtqConfig, id: i64, dir: Option<&Path>) -> Result<()> {
    let download_dir = cfg.resolve_download_dir(dir)?;
    let job_control = Arc::new(JobControl::new());
    let ctrl_c = tokio::spawn({
        let job_control = Arc::clone(&job_control);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                job_control.cancel_all();
            }
        }
    });

    let ctx = DownloadContext::new(db.clone(), cfg, download_dir).with_control(job_control);
    println!("Retrying item {id}...");
    let outcome = scheduler::retry_item(&ctx, id).await;
    ctrl_c.abort();

    let item = db.get_item(id).await?;
    let status = item
        .as_ref()
        .map(|i| i.display_status())
        .unwrap_or_default();
    match outcome? {
        ItemOutcome::Done | ItemOutcome::Skipped => {
            let path = item
                .and_then(|i| i.output_path)
                .unwrap_or_else(|| "(already in download archive)".to_string());
            println!("Item {id}: {status} -> {path}");
        }
        ItemOutcome::Cancelled | ItemOutcome::Failed => println!("Item {id}: {status}"),
    }
    Ok(())
}
