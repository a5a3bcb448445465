//! Title and playlist resolution via `yt-dlp --flat-playlist -J`.

use serde::Deserialize;

use super::error::YtDlpError;
use super::YtDlp;

const WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// What a submitted link turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Single { title: String },
    Playlist { entries: Vec<PlaylistEntry> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct FlatInfo {
    #[serde(rename = "_type")]
    kind: Option<String>,
    title: Option<String>,
    #[serde(default)]
    entries: Option<Vec<Option<FlatEntry>>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    url: Option<String>,
    id: Option<String>,
    title: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Interpret the JSON dump of a flat extraction for `url`.
pub fn parse_flat_json(url: &str, json: &str) -> Result<Resolved, YtDlpError> {
    let info: Option<FlatInfo> = serde_json::from_str(json)?;
    let info = info.ok_or(YtDlpError::Empty)?;

    let entries = info.entries.unwrap_or_default();
    if info.kind.as_deref() == Some("playlist") && !entries.is_empty() {
        let entries = entries
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let raw = non_empty(entry.url).or_else(|| non_empty(entry.id))?;
                let url = if raw.starts_with("http") {
                    raw
                } else {
                    format!("{WATCH_PREFIX}{raw}")
                };
                let title = non_empty(entry.title).unwrap_or_else(|| url.clone());
                Some(PlaylistEntry { url, title })
            })
            .collect();
        return Ok(Resolved::Playlist { entries });
    }

    let title = non_empty(info.title).unwrap_or_else(|| url.to_string());
    Ok(Resolved::Single { title })
}

impl YtDlp {
    /// Look up the title of `url`, or its entries when it is a playlist.
    /// Nothing is downloaded.
    pub async fn resolve(&self, url: &str) -> Result<Resolved, YtDlpError> {
        let output = self
            .command()
            .args(["--flat-playlist", "-J", "--no-warnings", "--quiet"])
            .arg("--")
            .arg(url)
            .output()
            .await
            .map_err(|source| YtDlpError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtDlpError::failed(output.status.code(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(YtDlpError::Empty);
        }
        parse_flat_json(url, &stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_video_title() {
        let json = r#"{"_type": "video", "id": "abc", "title": "A Song"}"#;
        assert_eq!(
            parse_flat_json("https://youtu.be/abc", json).unwrap(),
            Resolved::Single {
                title: "A Song".into()
            }
        );
    }

    #[test]
    fn single_without_title_uses_url() {
        let json = r#"{"id": "abc", "title": null}"#;
        assert_eq!(
            parse_flat_json("https://youtu.be/abc", json).unwrap(),
            Resolved::Single {
                title: "https://youtu.be/abc".into()
            }
        );
    }

    #[test]
    fn playlist_entries_expand() {
        let json = r#"{
            "_type": "playlist",
            "title": "Mix",
            "entries": [
                {"url": "https://www.youtube.com/watch?v=aaaaaaaaaaa", "title": "One"},
                {"id": "bbbbbbbbbbb", "title": null},
                {"title": "no url or id"},
                null
            ]
        }"#;
        let Resolved::Playlist { entries } = parse_flat_json("https://x", json).unwrap() else {
            panic!("expected playlist");
        };
        assert_eq!(
            entries,
            vec![
                PlaylistEntry {
                    url: "https://www.youtube.com/watch?v=aaaaaaaaaaa".into(),
                    title: "One".into()
                },
                PlaylistEntry {
                    url: "https://www.youtube.com/watch?v=bbbbbbbbbbb".into(),
                    title: "https://www.youtube.com/watch?v=bbbbbbbbbbb".into()
                },
            ]
        );
    }

    #[test]
    fn empty_playlist_is_treated_as_single() {
        let json = r#"{"_type": "playlist", "title": "Empty", "entries": []}"#;
        assert_eq!(
            parse_flat_json("https://x", json).unwrap(),
            Resolved::Single {
                title: "Empty".into()
            }
        );
    }

    #[test]
    fn null_and_garbage() {
        assert!(matches!(
            parse_flat_json("https://x", "null"),
            Err(YtDlpError::Empty)
        ));
        assert!(matches!(
            parse_flat_json("https://x", "{not json"),
            Err(YtDlpError::InvalidJson(_))
        ));
    }
}
