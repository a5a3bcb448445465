//! yt-dlp integration: title/playlist resolution and audio downloads.
//!
//! yt-dlp is driven as a subprocess. Resolution reads its flat JSON dump;
//! downloads emit machine-readable progress lines through a custom
//! `--progress-template`, which `progress::parse_line` turns into events.

mod download;
mod error;
mod progress;
mod resolve;

pub use download::{DownloadOptions, DownloadOutcome};
pub use error::YtDlpError;
pub use progress::{parse_line, DownloadEvent};
pub use resolve::{parse_flat_json, PlaylistEntry, Resolved};

/// Handle to the yt-dlp executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.env("PYTHONIOENCODING", "UTF-8")
            .env("PYTHONUTF8", "1")
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}
