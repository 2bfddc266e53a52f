//! Bearer-token access gate for HTTP requests.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::{ApiKeyManager, Role};
use crate::error::{QueueError, Result};

/// Identity resolved by the gate, available to handlers as an extension.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub role: Role,
}

/// Per-route gate: validates the bearer token and enforces a role requirement.
#[derive(Clone)]
pub struct AccessGate {
    keys: ApiKeyManager,
    required: Option<Role>,
}

impl AccessGate {
    pub const fn new(keys: ApiKeyManager, required: Option<Role>) -> Self {
        Self { keys, required }
    }

    /// A gate that admits any valid key.
    pub const fn any(keys: ApiKeyManager) -> Self {
        Self::new(keys, None)
    }

    /// A gate that requires `role` (or admin).
    pub const fn require(keys: ApiKeyManager, role: Role) -> Self {
        Self::new(keys, Some(role))
    }

    /// Resolve the caller's role from `Authorization: Bearer <token>`.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Role> {
        let token = bearer_token(headers).ok_or(QueueError::Unauthorized)?;
        let role = self.keys.validate_token(token).await?;

        if !role.satisfies(self.required) {
            return Err(QueueError::Forbidden);
        }
        Ok(role)
    }
}

/// Extract the token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn enforce(State(gate): State<AccessGate>, mut req: Request, next: Next) -> Response {
    match gate.authorize(req.headers()).await {
        Ok(role) => {
            req.extensions_mut().insert(Principal { role });
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::digest::hash_secret;
    use crate::storage::QueueDatabase;
    use axum::http::HeaderValue;

    async fn keys_with_tokens() -> (ApiKeyManager, String, String) {
        let db = QueueDatabase::open_in_memory().await.unwrap();
        let alice = db.create_user("alice", &hash_secret("pw1")).await.unwrap();
        let root = db.create_user("root", &hash_secret("pw2")).await.unwrap();
        let keys = ApiKeyManager::new(db);
        let user_token = keys.issue_key(alice.id, Role::User).await.unwrap();
        let admin_token = keys.issue_key(root.id, Role::Admin).await.unwrap();
        (keys, user_token, admin_token)
    }

    fn auth_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_requires_scheme() {
        assert_eq!(bearer_token(&auth_headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&auth_headers("Basic abc")), None);
        assert_eq!(bearer_token(&auth_headers("abc")), None);
        assert_eq!(bearer_token(&auth_headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthorized() {
        let (keys, user_token, _) = keys_with_tokens().await;
        let gate = AccessGate::any(keys);

        let err = gate.authorize(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, QueueError::Unauthorized));

        let err = gate
            .authorize(&auth_headers(&format!("Token {user_token}")))
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let (keys, _, _) = keys_with_tokens().await;
        let gate = AccessGate::require(keys, Role::User);

        let err = gate.authorize(&auth_headers("Bearer deadbeef")).await.unwrap_err();
        assert!(matches!(err, QueueError::Unauthorized));
    }

    #[tokio::test]
    async fn role_requirements() {
        let (keys, user_token, admin_token) = keys_with_tokens().await;
        let user = auth_headers(&format!("Bearer {user_token}"));
        let admin = auth_headers(&format!("Bearer {admin_token}"));

        let any = AccessGate::any(keys.clone());
        assert_eq!(any.authorize(&user).await.unwrap(), Role::User);
        assert_eq!(any.authorize(&admin).await.unwrap(), Role::Admin);

        let user_gate = AccessGate::require(keys.clone(), Role::User);
        assert_eq!(user_gate.authorize(&user).await.unwrap(), Role::User);
        assert_eq!(user_gate.authorize(&admin).await.unwrap(), Role::Admin);

        let admin_gate = AccessGate::require(keys, Role::Admin);
        assert!(matches!(
            admin_gate.authorize(&user).await.unwrap_err(),
            QueueError::Forbidden
        ));
        assert_eq!(admin_gate.authorize(&admin).await.unwrap(), Role::Admin);
    }
}
