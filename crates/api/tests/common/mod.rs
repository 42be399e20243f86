//! Shared helpers for API integration tests. Requests go through the full
//! production router (middleware included) via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use curby_api::auth::jwt::JwtConfig;
use curby_api::auth::password;
use curby_api::config::ServerConfig;
use curby_api::router::build_app_router;
use curby_api::state::AppState;
use curby_db::models::profile::Profile;
use curby_db::repositories::profile_repo::ProfileRepo;
use curby_db::watch::RowWatcher;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "integration-test-signing-secret".into(),
            access_expiry_mins: 15,
            refresh_expiry_days: 7,
        },
    }
}

/// Build the production router wired to the test database.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let watcher = RowWatcher::spawn(&pool)
        .await
        .expect("failed to start row watcher");
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        watcher,
    };
    build_app_router(state, &config)
}

/// Send a request and decode the JSON body (empty bodies decode as `Null`).
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response was not JSON")
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request(app, Method::GET, uri, token, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    request(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    request(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    request(app, Method::DELETE, uri, token, None).await
}

pub const TEST_PASSWORD: &str = "pickup-around-the-corner-9";

/// Seed an account with the given role directly in the database.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> Profile {
    let hash = password::hash_password(TEST_PASSWORD).expect("failed to hash password");
    ProfileRepo::create(pool, email, "Test User", role, &hash, None)
        .await
        .expect("failed to seed user")
}

/// Seed an account and log it in, returning its access token.
pub async fn login_as(app: &Router, pool: &PgPool, email: &str, role: &str) -> String {
    seed_user(pool, email, role).await;
    let (status, body) = post(
        app,
        "/api/v1/auth/login",
        None,
        json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"]
        .as_str()
        .expect("no access token in login response")
        .to_string()
}
