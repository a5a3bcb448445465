//! Audio download: build the yt-dlp argument list, run it, stream events.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::error::YtDlpError;
use super::progress::{parse_line, DownloadEvent, OUTPUT_TEMPLATE, PROGRESS_TEMPLATE};
use super::YtDlp;
use crate::config::YtqConfig;
use crate::control::AbortToken;
use crate::video_id;

/// How often the abort token is checked while yt-dlp is quiet.
const ABORT_POLL: Duration = Duration::from_millis(200);

/// Name of the yt-dlp download archive kept in every download folder.
pub const ARCHIVE_FILE: &str = "downloaded.txt";

/// Output template; the `<id> - ` prefix is what skip-if-exists relies on.
pub const OUTPUT_NAME_TEMPLATE: &str = "%(id)s - %(title)s.%(ext)s";

/// Format and post-processing settings for one download.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub format: String,
    pub audio_format: String,
    pub audio_quality: String,
}

impl DownloadOptions {
    pub fn from_config(cfg: &YtqConfig) -> Self {
        Self {
            format: cfg.format.clone(),
            audio_format: cfg.audio_format.clone(),
            audio_quality: cfg.audio_quality.clone(),
        }
    }

    /// Arguments for downloading `url` into `dir` as audio.
    pub fn args(&self, url: &str, dir: &Path) -> Vec<String> {
        let output = dir.join(OUTPUT_NAME_TEMPLATE);
        let archive = dir.join(ARCHIVE_FILE);
        let quality = audio_quality_arg(&self.audio_quality);
        vec![
            "-f".into(),
            self.format.clone(),
            "-o".into(),
            output.to_string_lossy().into_owned(),
            "--no-playlist".into(),
            "--no-overwrites".into(),
            "--download-archive".into(),
            archive.to_string_lossy().into_owned(),
            "-x".into(),
            "--audio-format".into(),
            self.audio_format.clone(),
            "--audio-quality".into(),
            quality,
            "--newline".into(),
            "--progress".into(),
            "--no-warnings".into(),
            "--progress-template".into(),
            PROGRESS_TEMPLATE.into(),
            "--print".into(),
            OUTPUT_TEMPLATE.into(),
            "--".into(),
            url.into(),
        ]
    }
}

/// `--audio-quality` value: 0-10 is a VBR level and passes through; larger
/// plain numbers are bitrates in kbit/s and get a `K` suffix.
fn audio_quality_arg(quality: &str) -> String {
    let quality = quality.trim();
    match quality.parse::<u32>() {
        Ok(n) if n > 10 => format!("{n}K"),
        _ => quality.to_string(),
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from_config(&YtqConfig::default())
    }
}

/// Result of a successful yt-dlp run.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadOutcome {
    /// Final audio file, when it could be determined. yt-dlp prints nothing
    /// for links already listed in the download archive.
    pub path: Option<PathBuf>,
}

async fn forward(events: Option<&mpsc::Sender<DownloadEvent>>, event: DownloadEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}

impl YtDlp {
    /// Download `url` as audio into `dir`, forwarding parsed progress to `events`.
    ///
    /// The process is killed when `abort` trips and `YtDlpError::Cancelled` is
    /// returned. A non-zero exit yields `YtDlpError::Failed` with the last
    /// stderr line.
    pub async fn download(
        &self,
        url: &str,
        dir: &Path,
        opts: &DownloadOptions,
        abort: &AbortToken,
        events: Option<&mpsc::Sender<DownloadEvent>>,
    ) -> Result<DownloadOutcome, YtDlpError> {
        let args = opts.args(url, dir);
        tracing::debug!(url, program = %self.program, "spawning yt-dlp: {:?}", args);

        let mut child = self
            .command()
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| YtDlpError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            YtDlpError::Io(std::io::Error::other("yt-dlp stdout not captured"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            YtDlpError::Io(std::io::Error::other("yt-dlp stderr not captured"))
        })?;
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();

        let mut out_open = true;
        let mut err_open = true;
        let mut stderr_text = String::new();
        let mut reported_path: Option<PathBuf> = None;
        let mut ticker = tokio::time::interval(ABORT_POLL);

        while out_open || err_open {
            // Some yt-dlp builds print progress to stdout, others to stderr.
            let line = tokio::select! {
                line = out_lines.next_line(), if out_open => match line? {
                    Some(l) => Some(l),
                    None => { out_open = false; None }
                },
                line = err_lines.next_line(), if err_open => match line? {
                    Some(l) => {
                        if parse_line(&l).is_none() {
                            stderr_text.push_str(&l);
                            stderr_text.push('\n');
                        }
                        Some(l)
                    }
                    None => { err_open = false; None }
                },
                _ = ticker.tick() => None,
            };

            if abort.is_aborted() {
                tracing::info!(url, "aborting yt-dlp");
                let _ = child.kill().await;
                return Err(YtDlpError::Cancelled);
            }

            let Some(event) = line.as_deref().and_then(parse_line) else {
                continue;
            };
            if let DownloadEvent::Output(ref p) = event {
                reported_path = Some(PathBuf::from(p));
            }
            forward(events, event).await;
        }

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = async {
                loop {
                    tokio::time::sleep(ABORT_POLL).await;
                    if abort.is_aborted() {
                        break;
                    }
                }
            } => {
                let _ = child.kill().await;
                return Err(YtDlpError::Cancelled);
            }
        };

        if !status.success() {
            return Err(YtDlpError::failed(status.code(), &stderr_text));
        }

        let path = reported_path
            .or_else(|| video_id::find_existing_path(url, dir, &opts.audio_format));
        Ok(DownloadOutcome { path })
    }
}
