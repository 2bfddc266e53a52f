//! HTTP mapping of [`QueueError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::QueueError;

impl QueueError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Randomness(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Unauthorized | Self::Forbidden | Self::Validation(_) => self.to_string(),
            Self::Storage(_) | Self::Randomness(_) => {
                error!(error = %self, "Request failed");
                "Internal error".to_string()
            }
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use msgqueue_core::db::DatabaseError;

    async fn body_text(err: QueueError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        assert_eq!(
            body_text(QueueError::Unauthorized).await,
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
        );
        assert_eq!(
            body_text(QueueError::Forbidden).await,
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        );
        assert_eq!(
            body_text(QueueError::validation("Invalid days")).await,
            (StatusCode::BAD_REQUEST, "Invalid days".to_string())
        );
    }

    #[tokio::test]
    async fn storage_detail_is_not_exposed() {
        let err = QueueError::Storage(DatabaseError::Query("disk I/O error at /var/db".into()));
        let (status, body) = body_text(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error");
    }
}
