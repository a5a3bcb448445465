//! `ytq add <url>...` – add links (videos or playlists) to the queue.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use ytq_core::config::YtqConfig;
use ytq_core::queue_db::QueueDb;
use ytq_core::resolver::{self, ResolveReport};
use ytq_core::ytdlp::YtDlp;

/// Collect links from arguments (`-` = stdin) and an optional file.
fn collect_urls(args: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for arg in args {
        if arg == "-" {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("read links from stdin")?;
            urls.extend(resolver::parse_url_list(&text));
        } else {
            urls.extend(resolver::parse_url_list(arg));
        }
    }
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read links from {}", path.display()))?;
        urls.extend(resolver::parse_url_list(&text));
    }
    Ok(urls)
}

pub async fn run_add(
    db: &QueueDb,
    cfg: &YtqConfig,
    args: &[String],
    file: Option<&Path>,
    resolve: bool,
) -> Result<()> {
    let urls = collect_urls(args, file)?;
    if urls.is_empty() {
        anyhow::bail!("no links given; pass URLs, `-` for stdin, or --file");
    }

    let ytdlp = YtDlp::new(cfg.ytdlp_path.clone());
    if resolve {
        println!("Resolving {} link(s)...", urls.len());
    }
    let reports = resolver::add_urls(db, &ytdlp, &urls, resolve).await?;
    for report in reports {
        match report {
            ResolveReport::Titled { id, title } => println!("Added {id}: {title}"),
            ResolveReport::Expanded { url, ids } => {
                println!("Added playlist {url}: {} item(s)", ids.len())
            }
            ResolveReport::Fallback { id, url, error } => {
                println!("Added {id}: {url} (title lookup failed: {error})")
            }
            ResolveReport::Unresolved { id, url } => println!("Added {id}: {url}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_args_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("links.txt");
        std::fs::write(&file, "https://c\n\n https://d \n").unwrap();
        let args = vec!["https://a".to_string(), "https://b".to_string()];
        let urls = collect_urls(&args, Some(&file)).unwrap();
        assert_eq!(urls, vec!["https://a", "https://b", "https://c", "https://d"]);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_urls(&[], Some(&dir.path().join("nope.txt"))).is_err());
    }
}
