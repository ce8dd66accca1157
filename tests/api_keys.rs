//! End-to-end tests for the API key lifecycle over the HTTP boundary

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use keymint::api::{create_router, AppState};
use keymint::config::ApiKeySettings;
use keymint::domain::api_key::{Clock, FixedClock};
use keymint::infrastructure::api_key::{ApiKeyManager, InMemoryKeyStore, SecretGenerator};
use keymint::infrastructure::session::StaticTokenVerifier;

const NOW: i64 = 1_700_000_000;
const THIRTY_DAYS: i64 = 2_592_000;

fn test_app() -> Router {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NOW));

    let store = Arc::new(InMemoryKeyStore::new(clock.clone()));
    let manager =
        ApiKeyManager::new(store, clock.clone()).with_generator(SecretGenerator::test());

    let sessions = Arc::new(
        StaticTokenVerifier::default()
            .with_token("alice-token", "alice")
            .with_token("bob-token", "bob"),
    );

    let state = AppState::new(
        Arc::new(manager),
        sessions,
        clock,
        ApiKeySettings::default(),
    );

    create_router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn test_requests_without_session_are_rejected() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api-keys", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "authentication_error");

    let (status, _) = send(&app, "POST", "/api-keys", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api-keys", Some("unknown-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let app = test_app();
    let token = Some("alice-token");

    // Create: the only response that carries the secret
    let (status, created) = send(
        &app,
        "POST",
        "/api-keys",
        token,
        Some(json!({"name": "k1", "expires_at": NOW + THIRTY_DAYS})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let secret = created["secret"].as_str().unwrap();
    assert!(secret.starts_with("km_test_"));
    assert_eq!(created["name"], "k1");
    assert_eq!(created["created_at"], NOW);
    assert_eq!(created["expires_at"], NOW + THIRTY_DAYS);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    // List: one record, secret never reappears
    let (status, listed) = send(&app, "GET", "/api-keys", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["api_keys"][0]["name"], "k1");
    assert!(listed["api_keys"][0].get("secret").is_none());
    let listed_text = listed.to_string();
    assert!(!listed_text.contains("\"secret\""));
    assert!(!listed_text.contains(secret));

    // Update expiration only; name is untouched
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api-keys/{}", id),
        token,
        Some(json!({"expires_at": NOW + 2 * THIRTY_DAYS})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["expires_at"], NOW + 2 * THIRTY_DAYS);
    assert_eq!(updated["name"], "k1");
    assert!(updated.get("secret").is_none());

    // Revoke: 204, then the key is gone
    let (status, body) = send(&app, "DELETE", &format!("/api-keys/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "DELETE", &format!("/api-keys/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");

    let (_, listed) = send(&app, "GET", "/api-keys", token, None).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn test_create_rejects_past_expiration() {
    let app = test_app();
    let token = Some("alice-token");

    let (status, body) = send(
        &app,
        "POST",
        "/api-keys",
        token,
        Some(json!({"expires_at": NOW - 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");

    // Nothing was persisted
    let (_, listed) = send(&app, "GET", "/api-keys", token, None).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn test_create_applies_default_expiration() {
    let app = test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api-keys",
        Some("alice-token"),
        Some(json!({"name": "defaulted"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["expires_at"], NOW + THIRTY_DAYS);
}

#[tokio::test]
async fn test_keys_are_scoped_to_their_owner() {
    let app = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/api-keys",
        Some("alice-token"),
        Some(json!({"name": "alices", "expires_at": NOW + 60})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Bob sees nothing
    let (_, listed) = send(&app, "GET", "/api-keys", Some("bob-token"), None).await;
    assert_eq!(listed["total"], 0);

    // Bob cannot read, update or revoke Alice's key
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api-keys/{}", id),
        Some("bob-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api-keys/{}", id),
        Some("bob-token"),
        Some(json!({"name": "stolen"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api-keys/{}", id),
        Some("bob-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice still has it, unchanged
    let (status, fetched) = send(
        &app,
        "GET",
        &format!("/api-keys/{}", id),
        Some("alice-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "alices");
}

#[tokio::test]
async fn test_update_with_empty_body_is_noop() {
    let app = test_app();
    let token = Some("alice-token");

    let (_, created) = send(
        &app,
        "POST",
        "/api-keys",
        token,
        Some(json!({"name": "k1", "expires_at": NOW + 60})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api-keys/{}", id),
        token,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "k1");
    assert_eq!(updated["expires_at"], NOW + 60);
    assert_eq!(updated["id"], id.as_str());
}

#[tokio::test]
async fn test_update_accepts_past_expiration() {
    let app = test_app();
    let token = Some("alice-token");

    let (_, created) = send(
        &app,
        "POST",
        "/api-keys",
        token,
        Some(json!({"expires_at": NOW + 60})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Unlike create, update may move expiration into the past
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api-keys/{}", id),
        token,
        Some(json!({"expires_at": NOW - 60})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["expires_at"], NOW - 60);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "PUT",
        "/api-keys/does-not-exist",
        Some("alice-token"),
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");
}

#[tokio::test]
async fn test_health_endpoints_need_no_session() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app, "GET", "/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
