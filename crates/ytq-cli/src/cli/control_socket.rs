//! Control socket: server (during `ytq run`) and client (for `ytq cancel`).
//! Protocol: one line per command: "cancel <id>" or "cancel all".

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use ytq_core::control::{AbortRequest, JobControl};

/// What a control line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    CancelAll,
    Cancel(i64),
}

impl ControlRequest {
    pub fn parse(line: &str) -> Option<Self> {
        let arg = line.trim().strip_prefix("cancel ")?.trim();
        if arg == "all" {
            return Some(ControlRequest::CancelAll);
        }
        arg.parse::<i64>().ok().map(ControlRequest::Cancel)
    }

    pub fn to_line(self) -> String {
        match self {
            ControlRequest::CancelAll => "cancel all\n".to_string(),
            ControlRequest::Cancel(id) => format!("cancel {id}\n"),
        }
    }

    fn apply(self, control: &JobControl) {
        match self {
            ControlRequest::CancelAll => control.cancel_all(),
            ControlRequest::Cancel(id) => match control.request_abort(id) {
                AbortRequest::Running => tracing::info!(id, "stopping running item"),
                AbortRequest::Pending => tracing::info!(
                    id,
                    running = ?control.running(),
                    "item not running; it will be cancelled when claimed"
                ),
            },
        }
    }
}

#[cfg(unix)]
mod imp {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{UnixListener, UnixStream};

    /// Spawns a task that listens on `path` and applies each control line to
    /// `job_control`. Ignores malformed lines.
    pub fn spawn_control_listener(
        job_control: Arc<JobControl>,
        path: impl AsRef<Path>,
    ) -> Result<tokio::task::JoinHandle<()>> {
        let path = path.as_ref().to_path_buf();
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path)?;
        let handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        let control = Arc::clone(&job_control);
                        tokio::spawn(async move {
                            let mut reader = BufReader::new(stream).lines();
                            while let Ok(Some(line)) = reader.next_line().await {
                                if let Some(req) = ControlRequest::parse(&line) {
                                    tracing::info!("control request: {:?}", req);
                                    req.apply(&control);
                                }
                            }
                        });
                    }
                    Err(e) => tracing::debug!("control socket accept: {}", e),
                }
            }
        });
        Ok(handle)
    }

    /// Sends one request to a running `ytq run`. Returns false when no run is listening.
    pub async fn send(socket_path: &Path, req: ControlRequest) -> Result<bool> {
        if !socket_path.exists() {
            return Ok(false);
        }
        let Ok(mut stream) = UnixStream::connect(socket_path).await else {
            return Ok(false);
        };
        stream.write_all(req.to_line().as_bytes()).await?;
        stream.shutdown().await?;
        Ok(true)
    }

    /// True if a `ytq run` is currently accepting control connections at `socket_path`.
    pub async fn is_active(socket_path: &Path) -> bool {
        socket_path.exists() && UnixStream::connect(socket_path).await.is_ok()
    }
}

#[cfg(not(unix))]
mod imp {
    use super::*;

    pub fn spawn_control_listener(
        _job_control: Arc<JobControl>,
        _path: impl AsRef<Path>,
    ) -> Result<tokio::task::JoinHandle<()>> {
        anyhow::bail!("control socket is only available on Unix")
    }

    pub async fn send(_socket_path: &Path, _req: ControlRequest) -> Result<bool> {
        Ok(false)
    }

    pub async fn is_active(_socket_path: &Path) -> bool {
        false
    }
}

pub use imp::{is_active, send, spawn_control_listener};
