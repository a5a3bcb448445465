//! Download scheduler.
//!
//! Runs queued items through yt-dlp with a bounded worker pool:
//! claim → skip-if-exists → download → record outcome. Progress is persisted
//! to the queue DB and forwarded to the CLI over a channel.

mod item;
mod pool;
mod progress;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::YtqConfig;
use crate::control::JobControl;
use crate::queue_db::QueueDb;
use crate::ytdlp::{DownloadOptions, YtDlp};

pub use item::{download_item, retry_item, ItemOutcome};
pub use pool::run_queue;
pub use progress::{ProgressEvent, RunSummary};

/// Everything a worker needs to download one item. Cheap to clone.
#[derive(Clone)]
pub struct DownloadContext {
    pub db: QueueDb,
    pub ytdlp: YtDlp,
    pub options: DownloadOptions,
    pub download_dir: PathBuf,
    pub control: Arc<JobControl>,
    pub progress_tx: Option<mpsc::Sender<ProgressEvent>>,
}

impl DownloadContext {
    pub fn new(db: QueueDb, cfg: &YtqConfig, download_dir: PathBuf) -> Self {
        Self {
            db,
            ytdlp: YtDlp::new(cfg.ytdlp_path.clone()),
            options: DownloadOptions::from_config(cfg),
            download_dir,
            control: Arc::new(JobControl::new()),
            progress_tx: None,
        }
    }

    pub fn with_control(mut self, control: Arc<JobControl>) -> Self {
        self.control = control;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<ProgressEvent>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}
