//! `ytq show <id>` – reveal the item's audio file in the file manager.

use anyhow::Result;
use std::path::Path;
use ytq_core::config::YtqConfig;
use ytq_core::desktop;
use ytq_core::queue_db::QueueDb;

pub async fn run_show(db: &QueueDb, cfg: &YtqConfig, id: i64, dir: Option<&Path>) -> Result<()> {
    let download_dir = cfg.resolve_download_dir(dir)?;
    let Some(path) = desktop::locate_item_file(db, id, &download_dir, &cfg.audio_format).await?
    else {
        println!("File not found on disk yet.");
        return Ok(());
    };

    println!("{}", path.display());
    if let Err(e) = desktop::reveal(&path).await {
        tracing::warn!("{:#}", e);
        println!("Could not open folder for {}", path.display());
    }
    Ok(())
}
