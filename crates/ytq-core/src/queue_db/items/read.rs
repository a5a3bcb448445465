//! Item read operations: list, get, aggregate progress.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::super::db::QueueDb;
use super::super::types::{ItemId, ItemStatus, QueueItem};

fn item_from_row(row: &SqliteRow) -> QueueItem {
    let status: String = row.get("status");
    QueueItem {
        id: row.get("id"),
        url: row.get("url"),
        title: row.get("title"),
        progress: row.get("progress"),
        status: ItemStatus::parse(&status),
        detail: row.get("detail"),
        output_path: row.get("output_path"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl QueueDb {
    /// List all items in queue order (oldest first).
    pub async fn list_items(&self) -> Result<Vec<QueueItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, url, title, progress, status, detail, output_path,
                   created_at, updated_at
            FROM items
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Fetch a single item.
    pub async fn get_item(&self, id: ItemId) -> Result<Option<QueueItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, url, title, progress, status, detail, output_path,
                   created_at, updated_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }

    /// Mean progress of all items in percent; 0 for an empty queue.
    pub async fn global_progress(&self) -> Result<f64> {
        let row = sqlx::query(r#"SELECT AVG(progress) AS avg FROM items"#)
            .fetch_one(&self.pool)
            .await?;
        let avg: Option<f64> = row.get("avg");
        Ok(avg.unwrap_or(0.0))
    }
}
