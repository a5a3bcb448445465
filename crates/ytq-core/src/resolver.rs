//! Adding links to the queue and resolving their titles.
//!
//! Each link is inserted as a placeholder first so it shows up immediately;
//! resolution then fills in the title, or replaces the placeholder with one
//! item per entry when the link is a playlist.

use anyhow::Result;

use crate::queue_db::{ItemId, QueueDb};
use crate::ytdlp::{Resolved, YtDlp};

/// What happened to one submitted link.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveReport {
    /// Single video; title stored on the placeholder.
    Titled { id: ItemId, title: String },
    /// Playlist; placeholder removed and entries queued.
    Expanded { url: String, ids: Vec<ItemId> },
    /// Lookup failed; the URL is used as the title.
    Fallback {
        id: ItemId,
        url: String,
        error: String,
    },
    /// Added without looking anything up.
    Unresolved { id: ItemId, url: String },
}

/// Split pasted or dropped text into links: one per line or whitespace
/// separated, with drag-and-drop `{...}` wrapping removed.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|part| part.trim_matches(|c| c == '{' || c == '}').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve the placeholder `id` for `url`.
pub async fn resolve_into_queue(
    db: &QueueDb,
    ytdlp: &YtDlp,
    id: ItemId,
    url: &str,
) -> Result<ResolveReport> {
    match ytdlp.resolve(url).await {
        Ok(Resolved::Single { title }) => {
            db.update_title(id, &title).await?;
            Ok(ResolveReport::Titled { id, title })
        }
        Ok(Resolved::Playlist { entries }) => {
            db.remove_item(id).await?;
            let mut ids = Vec::with_capacity(entries.len());
            for entry in &entries {
                ids.push(db.add_resolved_item(&entry.url, &entry.title).await?);
            }
            tracing::info!(url, entries = ids.len(), "expanded playlist");
            Ok(ResolveReport::Expanded {
                url: url.to_string(),
                ids,
            })
        }
        Err(e) => {
            tracing::warn!(url, "could not resolve title: {}", e);
            db.update_title(id, url).await?;
            Ok(ResolveReport::Fallback {
                id,
                url: url.to_string(),
                error: e.to_string(),
            })
        }
    }
}

/// Add links to the queue. Blank entries are skipped. With `resolve`,
/// all links are looked up concurrently after their placeholders are stored.
pub async fn add_urls(
    db: &QueueDb,
    ytdlp: &YtDlp,
    urls: &[String],
    resolve: bool,
) -> Result<Vec<ResolveReport>> {
    let mut placeholders = Vec::new();
    for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        let id = db.add_item(url).await?;
        placeholders.push((id, url.to_string()));
    }

    if !resolve {
        return Ok(placeholders
            .into_iter()
            .map(|(id, url)| ResolveReport::Unresolved { id, url })
            .collect());
    }

    let mut join_set = tokio::task::JoinSet::new();
    for (index, (id, url)) in placeholders.into_iter().enumerate() {
        let db = db.clone();
        let ytdlp = ytdlp.clone();
        join_set.spawn(async move {
            let report = resolve_into_queue(&db, &ytdlp, id, &url).await;
            (index, report)
        });
    }

    let mut reports = Vec::with_capacity(join_set.len());
    while let Some(res) = join_set.join_next().await {
        let (index, report) = res.map_err(|e| anyhow::anyhow!("resolve task join: {}", e))?;
        reports.push((index, report?));
    }
    reports.sort_by_key(|(index, _)| *index);
    Ok(reports.into_iter().map(|(_, r)| r).collect())
}
