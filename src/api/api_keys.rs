//! API key management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{ApiKeyRecord, ApiKeyUpdate, Clock};

/// Request to create a new API key
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApiKeyRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    /// Expiration in seconds since epoch. Defaults to now plus the
    /// configured default lifetime.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Request to update an API key. Absent fields are left unchanged;
/// immutable fields cannot be expressed here at all.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl From<UpdateApiKeyRequest> for ApiKeyUpdate {
    fn from(req: UpdateApiKeyRequest) -> Self {
        Self {
            name: req.name,
            expires_at: req.expires_at,
        }
    }
}

/// API key as returned by every read path. Carries no secret.
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: Option<String>,
    pub key_prefix: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl From<&ApiKeyRecord> for ApiKeyResponse {
    fn from(record: &ApiKeyRecord) -> Self {
        Self {
            id: record.id().as_str().to_string(),
            name: record.name().map(String::from),
            key_prefix: record.key_prefix().to_string(),
            created_at: record.created_at(),
            expires_at: record.expires_at(),
        }
    }
}

/// Creation response: the plaintext secret appears here and nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyWithSecretResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub secret: String,
}

/// List response
#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

/// POST /api-keys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireSession(principal): RequireSession,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKeyWithSecretResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(principal = %principal, "creating API key");

    let expires_at = request
        .expires_at
        .unwrap_or_else(|| state.clock.now_secs() + state.settings.default_ttl_secs);

    let created = state
        .api_keys
        .create(&principal, request.name, expires_at)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyWithSecretResponse {
        api_key: ApiKeyResponse::from(&created.record),
        secret: created.secret,
    }))
}

/// GET /api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireSession(principal): RequireSession,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(principal = %principal, "listing API keys");

    let records = state
        .api_keys
        .list(&principal)
        .await
        .map_err(ApiError::from)?;

    let api_keys: Vec<ApiKeyResponse> = records.iter().map(ApiKeyResponse::from).collect();
    let total = api_keys.len();

    Ok(Json(ListApiKeysResponse { api_keys, total }))
}

/// GET /api-keys/{key_id}
pub async fn get_api_key(
    State(state): State<AppState>,
    RequireSession(principal): RequireSession,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    debug!(principal = %principal, key_id = %key_id, "getting API key");

    let record = state
        .api_keys
        .get(&principal, &key_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("API key '{}' not found", key_id)))?;

    Ok(Json(ApiKeyResponse::from(&record)))
}

/// PUT /api-keys/{key_id}
pub async fn update_api_key(
    State(state): State<AppState>,
    RequireSession(principal): RequireSession,
    Path(key_id): Path<String>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(principal = %principal, key_id = %key_id, "updating API key");

    let record = state
        .api_keys
        .update(&principal, &key_id, request.into())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyResponse::from(&record)))
}

/// DELETE /api-keys/{key_id}
pub async fn revoke_api_key(
    State(state): State<AppState>,
    RequireSession(principal): RequireSession,
    Path(key_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(principal = %principal, key_id = %key_id, "revoking API key");

    state
        .api_keys
        .revoke(&principal, &key_id)
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
