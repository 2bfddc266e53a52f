//! Message store over the queue database.

use msgqueue_core::db::{SECS_PER_DAY, unix_timestamp};
use serde_json::value::RawValue;
use tracing::{debug, info, instrument};

use crate::error::{QueueError, Result};
use crate::storage::{Message, QueueDatabase};

/// Sole owner of the `messages` table.
#[derive(Clone)]
pub struct MessageStore {
    db: QueueDatabase,
}

impl MessageStore {
    pub const fn new(db: QueueDatabase) -> Self {
        Self { db }
    }

    /// Append a message. `content` must be non-empty, syntactically valid JSON.
    ///
    /// Returns the row as committed, with its store-assigned id and timestamp.
    pub async fn add(&self, content: &str) -> Result<Message> {
        validate_content(content)?;

        let message = self.db.insert_message(content, None).await?;
        debug!(id = message.id, bytes = content.len(), "Message appended");
        Ok(message)
    }

    /// Messages with id greater than `after_id`, oldest first.
    ///
    /// A `limit` of zero returns every matching message.
    pub async fn get_all(&self, after_id: i64, limit: i64) -> Result<Vec<Message>> {
        if after_id < 0 {
            return Err(QueueError::validation("Invalid after_id"));
        }
        if limit < 0 {
            return Err(QueueError::validation("Invalid limit"));
        }

        // Limits beyond u32 cannot be reached by any real table; treat as unbounded.
        let limit = u32::try_from(limit).ok().filter(|&n| n > 0);
        Ok(self.db.list_messages_after(after_id, limit).await?)
    }

    /// Purge messages older than `days` days and return how many were removed.
    #[instrument(skip(self))]
    pub async fn delete_older_than(&self, days: i64) -> Result<u64> {
        let cutoff = retention_cutoff(unix_timestamp(), days)?;

        let removed = self.db.delete_messages_before(cutoff).await?;
        info!(removed, cutoff, "Purged expired messages");
        Ok(removed)
    }

    /// Number of messages currently stored.
    pub async fn count(&self) -> Result<i64> {
        Ok(self.db.count_messages().await?)
    }
}

/// Reject empty content and content that is not a single JSON value.
pub fn validate_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(QueueError::validation("Content is required"));
    }
    serde_json::from_str::<&RawValue>(content)
        .map_err(|_| QueueError::validation("Content must be valid JSON"))?;
    Ok(())
}

/// Unix timestamp before which messages fall outside a `days`-day window.
pub fn retention_cutoff(now: i64, days: i64) -> Result<i64> {
    if days <= 0 {
        return Err(QueueError::validation("Invalid days"));
    }
    days.checked_mul(SECS_PER_DAY)
        .and_then(|window| now.checked_sub(window))
        .ok_or_else(|| QueueError::validation("Invalid days"))
}
