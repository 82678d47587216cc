//! HTTP-level integration tests for sign-up, login, refresh and revoke.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, build_test_app, log_in, post_bearer, post_empty, post_json,
    post_with_authorization, put_json_auth, sign_up, sign_up_and_log_in, str_field,
    TEST_JWT_SECRET,
};
use serde_json::json;
use uuid::Uuid;

use chirpy_api::auth::jwt::{issue_access_token_at, validate_access_token};
use chirpy_core::refresh_token::{generate_refresh_token, REFRESH_TOKEN_LEN};
use chirpy_db::models::refresh_token::RefreshToken;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_user_returns_public_fields_only() {
    let (app, _store) = build_test_app();

    let json = sign_up(&app, "walt@breakingbad.com", "123456").await;

    assert!(json["id"].is_string());
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
    assert_eq!(json["email"], "walt@breakingbad.com");
    assert_eq!(json["is_chirpy_red"], false);
    assert!(json.get("hashed_password").is_none());
    assert!(json.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_with_empty_password_is_rejected() {
    let (app, _store) = build_test_app();

    let body = json!({ "email": "empty@example.com", "password": "" });
    let response = post_json(app, "/api/users", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_with_duplicate_email_conflicts() {
    let (app, _store) = build_test_app();
    sign_up(&app, "dup@example.com", "first").await;

    let body = json!({ "email": "dup@example.com", "password": "second" });
    let response = post_json(app, "/api/users", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn test_update_user_changes_credentials() {
    let (app, _store) = build_test_app();
    let login = sign_up_and_log_in(&app, "before@example.com").await;
    let token = str_field(&login, "token");

    let body = json!({ "email": "after@example.com", "password": "new-password" });
    let response = put_json_auth(app.clone(), "/api/users", body, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["email"], "after@example.com");
    assert_eq!(json["id"], login["id"]);

    // The new credentials work, the old email no longer does.
    log_in(&app, "after@example.com", "new-password").await;
    let body = json!({ "email": "before@example.com", "password": "correct-horse-battery-staple" });
    let response = post_json(app, "/api/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user_requires_access_token() {
    let (app, _store) = build_test_app();

    let body = json!({ "email": "x@example.com", "password": "pw" });
    let response = put_json_auth(app, "/api/users", body, "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_returns_user_and_both_tokens() {
    let (app, _store) = build_test_app();
    let user = sign_up(&app, "login@example.com", "04234").await;

    let json = log_in(&app, "login@example.com", "04234").await;

    assert_eq!(json["id"], user["id"]);
    assert_eq!(json["email"], "login@example.com");
    let refresh_token = str_field(&json, "refresh_token");
    assert_eq!(refresh_token.len(), REFRESH_TOKEN_LEN);

    let subject = validate_access_token(str_field(&json, "token"), TEST_JWT_SECRET.as_bytes())
        .expect("issued token should validate");
    assert_eq!(subject.to_string(), str_field(&user, "id"));
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let (app, _store) = build_test_app();
    sign_up(&app, "known@example.com", "right").await;

    let wrong_password = post_json(
        app.clone(),
        "/api/login",
        json!({ "email": "known@example.com", "password": "wrong" }),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/login",
        json!({ "email": "ghost@example.com", "password": "right" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a["error"], "Incorrect email or password");
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Refresh / revoke
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let (app, store) = build_test_app();
    let login = sign_up_and_log_in(&app, "refresh@example.com").await;
    let refresh_token = str_field(&login, "refresh_token");

    let response = post_bearer(app.clone(), "/api/refresh", refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let subject = validate_access_token(str_field(&json, "token"), TEST_JWT_SECRET.as_bytes())
        .expect("refreshed token should validate");
    assert_eq!(subject.to_string(), str_field(&login, "id"));

    // No rotation: the same refresh token keeps working and is unchanged.
    let response = post_bearer(app, "/api/refresh", refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = store.refresh_token(refresh_token).expect("record exists");
    assert!(record.revoked_at.is_none());
}

#[tokio::test]
async fn test_refresh_without_usable_token_is_unauthorized() {
    let (app, _store) = build_test_app();

    let missing = post_empty(app.clone(), "/api/refresh").await;
    let wrong_scheme = post_with_authorization(app.clone(), "/api/refresh", "Basic abc").await;
    let unknown = post_bearer(app.clone(), "/api/refresh", &generate_refresh_token()).await;
    let malformed = post_bearer(app, "/api/refresh", "abc").await;

    for response in [missing, wrong_scheme, unknown, malformed] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_revoked_refresh_token_is_rejected() {
    let (app, _store) = build_test_app();
    let login = sign_up_and_log_in(&app, "revoke@example.com").await;
    let refresh_token = str_field(&login, "refresh_token");

    let response = post_bearer(app.clone(), "/api/revoke", refresh_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Revoking again is still fine.
    let response = post_bearer(app.clone(), "/api/revoke", refresh_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_bearer(app, "/api/refresh", refresh_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoke_requires_bearer_header() {
    let (app, _store) = build_test_app();

    let response = post_empty(app, "/api/revoke").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_refresh_token_is_rejected() {
    let (app, store) = build_test_app();
    let user = sign_up(&app, "expired@example.com", "pw").await;
    let user_id: Uuid = str_field(&user, "id").parse().unwrap();

    let now = Utc::now();
    let token = generate_refresh_token();
    store.insert_refresh_token(RefreshToken {
        token: token.clone(),
        user_id,
        created_at: now - Duration::days(61),
        updated_at: now - Duration::days(61),
        expires_at: now - Duration::days(1),
        revoked_at: None,
    });

    let response = post_bearer(app, "/api/refresh", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let (app, _store) = build_test_app();
    let user = sign_up(&app, "stale@example.com", "pw").await;
    let user_id: Uuid = str_field(&user, "id").parse().unwrap();

    let token = issue_access_token_at(
        user_id,
        TEST_JWT_SECRET.as_bytes(),
        Duration::hours(1),
        Utc::now() - Duration::hours(2),
    )
    .unwrap();

    let body = json!({ "email": "stale@example.com", "password": "pw2" });
    let response = put_json_auth(app, "/api/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
