//! API key issuance, validation, and revocation.
//!
//! Keys are opaque 256-bit random tokens handed to the client once; only
//! their digest is stored. Each user holds at most one live key.

use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::digest::hash_secret;
use super::role::Role;
use crate::error::{QueueError, Result};
use crate::storage::QueueDatabase;

/// Raw token length in bytes (hex-encoded to 64 characters).
pub const TOKEN_BYTES: usize = 32;

/// Sole writer of the `api_keys` table.
#[derive(Clone)]
pub struct ApiKeyManager {
    db: QueueDatabase,
}

impl ApiKeyManager {
    pub const fn new(db: QueueDatabase) -> Self {
        Self { db }
    }

    /// Generate a fresh hex-encoded token from the OS random source.
    pub fn generate_token() -> Result<String> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| QueueError::Randomness(e.to_string()))?;
        Ok(hex::encode(bytes))
    }

    /// Issue a new key for `user_id`, invalidating any key it held before.
    ///
    /// The returned token is the only copy of the raw value.
    #[instrument(skip(self))]
    pub async fn issue_key(&self, user_id: i64, role: Role) -> Result<String> {
        let token = Self::generate_token()?;
        self.db
            .replace_api_key(user_id, &hash_secret(&token), role)
            .await?;

        info!(user_id, %role, "API key issued");
        Ok(token)
    }

    /// Resolve a bearer token to the role of its key.
    pub async fn validate_token(&self, token: &str) -> Result<Role> {
        self.db
            .get_api_key_by_hash(&hash_secret(token))
            .await?
            .map(|key| key.role)
            .ok_or(QueueError::Unauthorized)
    }

    /// Delete the key matching `token`. Revoking an absent key is not an error.
    #[instrument(skip_all)]
    pub async fn revoke_token(&self, token: &str) -> Result<()> {
        let removed = self.db.delete_api_key_by_hash(&hash_secret(token)).await?;
        debug!(removed, "API key revoked");
        Ok(())
    }
}
