//! HTTP routes: login/logout and the `/messages` resource.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use super::gate::{AccessGate, Principal, bearer_token, enforce};
use crate::auth::{ApiKeyManager, CredentialStore, Role};
use crate::error::{QueueError, Result};
use crate::messages::MessageStore;
use crate::storage::{Message, QueueDatabase};

/// Shared application state: one instance of each component over one database.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub keys: ApiKeyManager,
    pub messages: MessageStore,
}

impl AppState {
    pub fn new(db: QueueDatabase) -> Self {
        Self {
            credentials: CredentialStore::new(db.clone()),
            keys: ApiKeyManager::new(db.clone()),
            messages: MessageStore::new(db),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// Raw query values, parsed by hand so bad input maps to a named error.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    after_id: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PurgeParams {
    days: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub deleted: u64,
}

pub fn build_router(state: AppState) -> Router {
    let any_key = from_fn_with_state(AccessGate::any(state.keys.clone()), enforce);
    let user = from_fn_with_state(AccessGate::require(state.keys.clone(), Role::User), enforce);
    let admin = from_fn_with_state(AccessGate::require(state.keys.clone(), Role::Admin), enforce);

    let messages = get(list_messages)
        .post(add_message)
        .route_layer(user)
        .merge(delete(purge_messages).route_layer(admin));

    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/logout", post(logout).route_layer(any_key))
        .route("/messages", messages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /health`
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /login`: verify credentials and issue a fresh `user` key.
#[instrument(skip_all)]
async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<LoginResponse>> {
    let req: LoginRequest = decode_body(&body)?;

    let user_id = state
        .credentials
        .authenticate(&req.username, &req.password)
        .await?;
    let api_key = state.keys.issue_key(user_id, Role::User).await?;

    info!(user_id, "User logged in");
    Ok(Json(LoginResponse { api_key }))
}

/// `POST /logout`: revoke the presented key.
#[instrument(skip_all)]
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let token = bearer_token(&headers).ok_or(QueueError::Unauthorized)?;
    state.keys.revoke_token(token).await?;
    Ok(StatusCode::OK)
}

/// `POST /messages`
async fn add_message(State(state): State<AppState>, body: Bytes) -> Result<Json<Message>> {
    let req: AddMessageRequest = decode_body(&body)?;
    let message = state.messages.add(&req.content).await?;
    Ok(Json(message))
}

/// `GET /messages?after_id=&limit=`
async fn list_messages(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Message>>> {
    let Query(params) = params.map_err(|_| QueueError::validation("Invalid query"))?;
    let after_id = parse_param("after_id", params.after_id.as_deref())?.unwrap_or(0);
    let limit = parse_param("limit", params.limit.as_deref())?.unwrap_or(0);

    let messages = state.messages.get_all(after_id, limit).await?;
    Ok(Json(messages))
}

/// `DELETE /messages?days=`: admin only.
async fn purge_messages(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    params: std::result::Result<Query<PurgeParams>, QueryRejection>,
) -> Result<Json<PurgeResponse>> {
    let Query(params) = params.map_err(|_| QueueError::validation("Invalid query"))?;
    let days = parse_param("days", params.days.as_deref())?
        .ok_or_else(|| QueueError::validation("days parameter required"))?;

    let deleted = state.messages.delete_older_than(days).await?;
    info!(role = %principal.role, days, deleted, "Manual purge");
    Ok(Json(PurgeResponse { deleted }))
}

/// Decode a JSON request body regardless of its `Content-Type`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|_| QueueError::validation("Invalid JSON"))
}

/// Parse an optional integer query parameter; empty counts as absent.
fn parse_param(name: &str, value: Option<&str>) -> Result<Option<i64>> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| QueueError::validation(format!("Invalid {name}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_param_handles_absent_and_bad_values() {
        assert_eq!(parse_param("limit", None).unwrap(), None);
        assert_eq!(parse_param("limit", Some("")).unwrap(), None);
        assert_eq!(parse_param("limit", Some("25")).unwrap(), Some(25));

        let err = parse_param("after_id", Some("ten")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid after_id");
    }

    #[test]
    fn decode_body_maps_bad_json_to_validation() {
        let req: AddMessageRequest = decode_body(br#"{"content":"{}"}"#).unwrap();
        assert_eq!(req.content, "{}");

        let err = decode_body::<LoginRequest>(b"{oops").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON");
    }
}
