//! YouTube video id extraction and lookup of already-downloaded files.
//!
//! Finished files are named `<id> - <title>.<ext>`, so the id alone is
//! enough to tell whether a link has been downloaded into a folder before.

use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const ID_LEN: usize = 11;

fn is_video_id(s: &str) -> bool {
    s.len() == ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_youtube_host(host: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    matches!(
        host,
        "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtube-nocookie.com"
    )
}

/// Extract the 11-character video id from a YouTube link or a bare id.
///
/// Returns `None` for playlists, channels, other sites, and malformed ids.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{input}")))
        .ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    let candidate = if host == "youtu.be" || host == "www.youtu.be" {
        url.path_segments()?.next().map(str::to_string)
    } else if is_youtube_host(&host) {
        let mut segments = url.path_segments()?;
        match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            "shorts" | "embed" | "live" | "v" => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate.filter(|id| is_video_id(id))
}

/// Return a file in `dir` that was already downloaded for `url`, if any.
///
/// Matches `<id> - *.<ext>`; `None` when the id cannot be extracted or the
/// folder does not exist.
pub fn find_existing_path(url: &str, dir: &Path, ext: &str) -> Option<PathBuf> {
    let id = extract_video_id(url)?;
    let prefix = format!("{id} - ");
    let suffix = format!(".{ext}");
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&prefix) && name.ends_with(&suffix)
        })
        .map(|entry| entry.path())
        .collect();
    matches.sort();
    matches.into_iter().next()
}
