#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use chirpy_api::auth::jwt::JwtConfig;
use chirpy_api::config::ServerConfig;
use chirpy_api::router::build_app_router;
use chirpy_api::state::AppState;
use chirpy_db::MemoryStore;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// Build a test `ServerConfig` with safe defaults on the `dev` platform.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        platform: "dev".to_string(),
        database_url: None,
        jwt: JwtConfig::new(TEST_JWT_SECRET),
        polka_key: TEST_POLKA_KEY.to_string(),
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The store handle is returned so tests can seed or inspect records the
/// HTTP surface does not expose.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_store(store.clone(), config.clone());
    (build_app_router(state, &config), store)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

/// POST with an arbitrary `Authorization` header value and no body.
pub async fn post_with_authorization(app: Router, uri: &str, authorization: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST with `Authorization: Bearer <token>` and no body.
pub async fn post_bearer(app: Router, uri: &str, token: &str) -> Response<Body> {
    post_with_authorization(app, uri, &format!("Bearer {token}")).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Sign up via the API and return the user JSON.
pub async fn sign_up(app: &Router, email: &str, password: &str) -> Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app.clone(), "/api/users", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Log in via the API and return the JSON with `token` and `refresh_token`.
pub async fn log_in(app: &Router, email: &str, password: &str) -> Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app.clone(), "/api/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Sign up and log in; returns the login JSON.
pub async fn sign_up_and_log_in(app: &Router, email: &str) -> Value {
    let password = "correct-horse-battery-staple";
    sign_up(app, email, password).await;
    log_in(app, email, password).await
}

pub fn str_field<'a>(json: &'a Value, field: &str) -> &'a str {
    json[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field {field:?} in {json}"))
}
