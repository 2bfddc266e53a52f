//! Message log queries for the msgqueue server.

use super::db::QueueDatabase;
use super::models::Message;
use msgqueue_core::db::DatabaseError;

impl QueueDatabase {
    /// Append a message and read the stored row back.
    ///
    /// With no `timestamp` the database clock assigns one. Insert and
    /// read-back run in one transaction so the returned record is exactly
    /// what was committed.
    pub async fn insert_message(
        &self,
        content: &str,
        timestamp: Option<i64>,
    ) -> Result<Message, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let id = sqlx::query(
            "INSERT INTO messages (content, timestamp) VALUES (?, COALESCE(?, unixepoch()))",
        )
        .bind(content)
        .bind(timestamp)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let message = sqlx::query_as::<_, Message>(
            "SELECT id, content, timestamp FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Message {id}")))?;

        tx.commit().await?;
        Ok(message)
    }

    /// Messages with `id > after_id`, ascending, at most `limit` rows when set.
    pub async fn list_messages_after(
        &self,
        after_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, DatabaseError> {
        let messages = if let Some(limit) = limit {
            sqlx::query_as::<_, Message>(
                "SELECT id, content, timestamp FROM messages WHERE id > ? ORDER BY id ASC LIMIT ?",
            )
            .bind(after_id)
            .bind(limit)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Message>(
                "SELECT id, content, timestamp FROM messages WHERE id > ? ORDER BY id ASC",
            )
            .bind(after_id)
            .fetch_all(self.pool())
            .await?
        };

        Ok(messages)
    }

    /// Delete messages whose timestamp is strictly before `cutoff` (Unix seconds).
    pub async fn delete_messages_before(&self, cutoff: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM messages WHERE timestamp < ?")
            .bind(cutoff)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Count stored messages.
    pub async fn count_messages(&self) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool())
            .await?;

        Ok(row.0)
    }
}
