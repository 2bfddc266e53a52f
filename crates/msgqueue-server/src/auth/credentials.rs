//! Username/password verification against stored user records.

use tracing::{instrument, warn};

use super::digest::{digests_match, hash_secret};
use crate::error::{QueueError, Result};
use crate::storage::{DatabaseError, QueueDatabase};

#[derive(Clone)]
pub struct CredentialStore {
    db: QueueDatabase,
}

impl CredentialStore {
    pub const fn new(db: QueueDatabase) -> Self {
        Self { db }
    }

    /// Verify a username/password pair and return the user's id.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<i64> {
        let user = match self.db.get_user_by_username(username).await {
            Ok(user) => user,
            Err(DatabaseError::NotFound(_)) => {
                warn!("Login attempt for unknown user");
                return Err(QueueError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };

        if !digests_match(&hash_secret(password), &user.password_hash) {
            warn!(user_id = user.id, "Failed login attempt");
            return Err(QueueError::Unauthorized);
        }

        Ok(user.id)
    }
}
