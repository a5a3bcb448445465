//! Parsing of yt-dlp output lines produced by our progress/print templates.

/// Prefix of lines emitted by `--progress-template`.
pub(crate) const PROGRESS_TAG: &str = "ytq-progress|";
/// Prefix of lines emitted by `--print after_move:...`.
pub(crate) const OUTPUT_TAG: &str = "ytq-file|";

/// Template fields: status, downloaded bytes, total bytes, estimated total.
pub(crate) const PROGRESS_TEMPLATE: &str = "download:ytq-progress|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s";
pub(crate) const OUTPUT_TEMPLATE: &str = "after_move:ytq-file|%(filepath)s";

/// Something yt-dlp reported about a running download.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// Transfer in progress; percent in [0, 100].
    Progress { percent: f64 },
    /// Transfer finished; audio extraction follows.
    Finished,
    /// yt-dlp reported an error for the transfer.
    Failed,
    /// Final file path after post-processing.
    Output(String),
}

/// yt-dlp prints `NA` for missing template fields; byte counts may be floats.
fn parse_bytes(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() || field == "NA" || field == "None" {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Percent complete: downloaded / (total, else estimate, else 1), clamped.
fn percent(downloaded: Option<f64>, total: Option<f64>, estimate: Option<f64>) -> f64 {
    let total = total
        .filter(|t| *t > 0.0)
        .or(estimate.filter(|t| *t > 0.0))
        .unwrap_or(1.0);
    let done = downloaded.unwrap_or(0.0);
    (done / total * 100.0).clamp(0.0, 100.0)
}

/// Parse one line of yt-dlp output. Lines not produced by our templates
/// return `None`.
pub fn parse_line(line: &str) -> Option<DownloadEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(path) = line.strip_prefix(OUTPUT_TAG) {
        let path = path.trim();
        if path.is_empty() || path == "NA" {
            return None;
        }
        return Some(DownloadEvent::Output(path.to_string()));
    }

    let rest = line.trim_start().strip_prefix(PROGRESS_TAG)?;
    let mut fields = rest.split('|');
    let status = fields.next()?.trim();
    let downloaded = fields.next().and_then(parse_bytes);
    let total = fields.next().and_then(parse_bytes);
    let estimate = fields.next().and_then(parse_bytes);

    match status {
        "downloading" => Some(DownloadEvent::Progress {
            percent: percent(downloaded, total, estimate),
        }),
        "finished" => Some(DownloadEvent::Finished),
        "error" => Some(DownloadEvent::Failed),
        _ => None,
    }
}
