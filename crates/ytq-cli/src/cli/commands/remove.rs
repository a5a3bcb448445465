//! `ytq remove <id>...` – remove items; optionally delete their files with --delete-files.

use anyhow::Result;
use std::path::Path;
use ytq_core::queue_db::QueueDb;

pub async fn run_remove(db: &QueueDb, ids: &[i64], delete_files: bool) -> Result<()> {
    for &id in ids {
        let Some(item) = db.get_item(id).await? else {
            println!("No item {id}");
            continue;
        };
        if !delete_files {
            continue;
        }
        if let Some(path) = item.output_path.as_deref().map(Path::new) {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "deleted file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), "could not delete file: {}", e),
            }
        }
    }

    let removed = db.remove_items(ids).await?;
    println!("Removed {removed} item(s)");
    Ok(())
}
