//! Item write operations: add, claim, progress, status, remove.

use anyhow::Result;
use sqlx::Row;

use super::super::db::{unix_timestamp, QueueDb};
use super::super::types::{ItemId, ItemStatus};

impl QueueDb {
    /// Insert a placeholder item whose title is not known yet.
    pub async fn add_item(&self, url: &str) -> Result<ItemId> {
        self.insert(url, None).await
    }

    /// Insert an item whose title is already known (e.g. a playlist entry).
    pub async fn add_resolved_item(&self, url: &str, title: &str) -> Result<ItemId> {
        self.insert(url, Some(title)).await
    }

    async fn insert(&self, url: &str, title: Option<&str>) -> Result<ItemId> {
        let now = unix_timestamp();
        let row_id = sqlx::query(
            r#"
            INSERT INTO items (
                url, title, progress, status, detail, output_path,
                created_at, updated_at
            ) VALUES (?1, ?2, 0, ?3, NULL, NULL, ?4, ?5)
            "#,
        )
        .bind(url)
        .bind(title)
        .bind(ItemStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(row_id)
    }

    pub async fn update_title(&self, id: ItemId, title: &str) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE items
            SET title = ?1,
                updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(title)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record progress (percent, clamped to [0, 100]) together with the status it was reported in.
    pub async fn update_progress(&self, id: ItemId, percent: f64, status: ItemStatus) -> Result<()> {
        let now = unix_timestamp();
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        sqlx::query(
            r#"
            UPDATE items
            SET progress = ?1,
                status = ?2,
                updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(percent)
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Update the status of an item. `detail` is kept only for `Error`;
    /// moving back to `Queued` resets progress.
    pub async fn set_status(
        &self,
        id: ItemId,
        status: ItemStatus,
        detail: Option<&str>,
    ) -> Result<()> {
        let now = unix_timestamp();
        let detail = if status == ItemStatus::Error { detail } else { None };
        sqlx::query(
            r#"
            UPDATE items
            SET status = ?1,
                detail = ?2,
                progress = CASE WHEN ?1 = 'queued' THEN 0 ELSE progress END,
                updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(status.as_str())
        .bind(detail)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_output_path(&self, id: ItemId, path: &str) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE items
            SET output_path = ?1,
                updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(path)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Mark every item queued with zero progress. Returns the number of items.
    pub async fn queue_all(&self) -> Result<u64> {
        let now = unix_timestamp();
        let r = sqlx::query(
            r#"
            UPDATE items
            SET status = 'queued',
                progress = 0,
                detail = NULL,
                updated_at = ?1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }

    /// Atomically claim the next queued item (smallest id) by setting it to
    /// `downloading`. Multiple workers never pick the same item.
    ///
    /// One statement, so SQLite takes the write lock up front and waits on
    /// the busy timeout instead of failing a read-to-write upgrade.
    pub async fn claim_next_queued(&self) -> Result<Option<ItemId>> {
        let now = unix_timestamp();
        let row = sqlx::query(
            r#"
            UPDATE items
            SET status = 'downloading',
                updated_at = ?1
            WHERE id = (
                SELECT id FROM items
                WHERE status = 'queued'
                ORDER BY id ASC
                LIMIT 1
            )
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| row.get::<i64, _>("id")))
    }

    /// Reset items left mid-download (e.g. after a crash) back to `queued`.
    pub async fn recover_interrupted(&self) -> Result<u64> {
        let now = unix_timestamp();
        let r = sqlx::query(
            r#"
            UPDATE items
            SET status = 'queued',
                progress = 0,
                updated_at = ?1
            WHERE status IN ('downloading', 'postprocessing')
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }

    /// Mark every still-queued item cancelled. Returns the number affected.
    pub async fn cancel_queued(&self) -> Result<u64> {
        let now = unix_timestamp();
        let r = sqlx::query(
            r#"
            UPDATE items
            SET status = 'cancelled',
                progress = 0,
                updated_at = ?1
            WHERE status = 'queued'
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }

    /// Permanently remove an item. Returns false if it did not exist.
    pub async fn remove_item(&self, id: ItemId) -> Result<bool> {
        let r = sqlx::query(
            r#"
            DELETE FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected() > 0)
    }

    /// Remove several items in one transaction. Returns how many existed.
    pub async fn remove_items(&self, ids: &[ItemId]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;
        for id in ids {
            removed += sqlx::query(r#"DELETE FROM items WHERE id = ?1"#)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;
        Ok(removed)
    }
}
