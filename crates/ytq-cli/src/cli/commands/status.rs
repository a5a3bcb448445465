//! `ytq status` – show the queue.

use anyhow::Result;
use ytq_core::queue_db::QueueDb;

const TITLE_WIDTH: usize = 40;

/// Shorten to `width` characters, marking the cut with `…`.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub async fn run_status(db: &QueueDb) -> Result<()> {
    let items = db.list_items().await?;
    if items.is_empty() {
        println!("Queue is empty.");
        return Ok(());
    }

    println!(
        "{:<6} {:<w$} {:>8}  {:<18} {}",
        "ID",
        "TITLE",
        "PROGRESS",
        "STATUS",
        "URL",
        w = TITLE_WIDTH
    );
    for item in &items {
        println!(
            "{:<6} {:<w$} {:>7.1}%  {:<18} {}",
            item.id,
            truncate(item.display_title(), TITLE_WIDTH),
            item.progress,
            item.display_status(),
            item.url,
            w = TITLE_WIDTH
        );
    }
    let overall = db.global_progress().await?;
    println!("\nOverall: {:.1}% of {} item(s)", overall, items.len());
    Ok(())
}
