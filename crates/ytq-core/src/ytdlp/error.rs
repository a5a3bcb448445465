use std::io;
use thiserror::Error;

/// Failure at the yt-dlp process boundary. The Display text is what ends up
/// in an item's `error: ...` status.
#[derive(Debug, Error)]
pub enum YtDlpError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    Failed { code: Option<i32>, message: String },

    #[error("cancelled")]
    Cancelled,

    #[error("invalid yt-dlp JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("yt-dlp returned no metadata")]
    Empty,

    #[error("reading yt-dlp output: {0}")]
    Io(#[from] io::Error),
}

impl YtDlpError {
    /// Build a `Failed` error from the process exit code and its stderr,
    /// keeping only the last meaningful line.
    pub(crate) fn failed(code: Option<i32>, stderr: &str) -> Self {
        let message = stderr
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .map(|l| l.strip_prefix("ERROR:").unwrap_or(l).trim().to_string())
            .unwrap_or_else(|| match code {
                Some(c) => format!("yt-dlp exited with status {c}"),
                None => "yt-dlp was terminated by a signal".to_string(),
            });
        YtDlpError::Failed { code, message }
    }
}
