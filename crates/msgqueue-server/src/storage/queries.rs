//! User and API key queries for the msgqueue server.

use super::db::QueueDatabase;
use super::models::{ApiKey, User};
use crate::auth::Role;
use msgqueue_core::db::DatabaseError;

impl QueueDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Create a new user.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        let id = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(self.pool())
            .await?
            .last_insert_rowid();

        self.get_user(id).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("User with username {username}")))
    }

    // =========================================================================
    // API key queries
    // =========================================================================

    /// Replace every key owned by `user_id` with a single new key.
    ///
    /// The delete and the insert share one transaction, so no reader ever
    /// observes the user with zero or two live keys.
    pub async fn replace_api_key(
        &self,
        user_id: i64,
        key_hash: &str,
        role: Role,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM api_keys WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO api_keys (key_hash, user_id, role) VALUES (?, ?, ?)")
            .bind(key_hash)
            .bind(user_id)
            .bind(role)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Find a key by the digest of its token.
    pub async fn get_api_key_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DatabaseError> {
        let key = sqlx::query_as::<_, ApiKey>(
            "SELECT key_hash, user_id, role FROM api_keys WHERE key_hash = ?",
        )
        .bind(key_hash)
        .fetch_optional(self.pool())
        .await?;

        Ok(key)
    }

    /// Delete a key by digest. Returns whether a row was removed.
    pub async fn delete_api_key_by_hash(&self, key_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE key_hash = ?")
            .bind(key_hash)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count keys owned by a user.
    pub async fn count_api_keys_for_user(&self, user_id: i64) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM api_keys WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool())
            .await?;

        Ok(row.0)
    }
}
