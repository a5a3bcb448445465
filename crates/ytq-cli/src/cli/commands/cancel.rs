//! `ytq cancel [id]` – stop the active run (or one item). Without an active
//! run, queued items are marked cancelled directly.

use anyhow::Result;
use ytq_core::control;
use ytq_core::queue_db::{ItemStatus, QueueDb};

use crate::cli::control_socket::{self, ControlRequest};

pub async fn run_cancel(db: &QueueDb, id: Option<i64>) -> Result<()> {
    let req = id.map_or(ControlRequest::CancelAll, ControlRequest::Cancel);
    let delivered = match control::default_control_socket_path() {
        Ok(path) => control_socket::send(&path, req).await?,
        Err(_) => false,
    };
    if delivered {
        match id {
            Some(id) => println!("Cancelling item {id}..."),
            None => println!("Cancelling..."),
        }
        return Ok(());
    }

    match id {
        None => {
            let stale = db.recover_interrupted().await?;
            if stale > 0 {
                tracing::info!("{} item(s) left over from an interrupted run", stale);
            }
            let n = db.cancel_queued().await?;
            println!("No active run; cancelled {n} queued item(s)");
        }
        Some(id) => {
            let Some(item) = db.get_item(id).await? else {
                anyhow::bail!("item {} not found", id);
            };
            if item.status.is_terminal() {
                println!("Item {id} is already {}", item.display_status());
            } else {
                db.update_progress(id, 0.0, ItemStatus::Cancelled).await?;
                println!("Cancelled item {id}");
            }
        }
    }
    Ok(())
}
