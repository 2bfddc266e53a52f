//! Data models for msgqueue storage.

use serde::{Deserialize, Serialize};

use crate::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// A stored API key. Only the digest of the bearer token is kept.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApiKey {
    pub key_hash: String,
    pub user_id: i64,
    pub role: Role,
}

/// A queued message as persisted. `content` is JSON text, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub content: String,
    /// Unix seconds, assigned by the store on insert.
    pub timestamp: i64,
}
