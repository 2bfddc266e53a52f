//! Error taxonomy shared by the queue's components.

use msgqueue_core::db::DatabaseError;

/// Result alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Failure outcomes of the queue's operations.
///
/// `Unauthorized` deliberately carries no detail: bad credentials, unknown
/// tokens and malformed tokens are indistinguishable to callers.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),

    #[error("Random source failed: {0}")]
    Randomness(String),
}

impl QueueError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
