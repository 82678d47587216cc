//! Handlers for the `/users` resource (sign-up and credential changes).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chirpy_core::error::CoreError;
use chirpy_core::types::{DbId, Timestamp};
use chirpy_db::models::user::{CreateUser, UpdateUserCredentials, User};
use serde::{Deserialize, Serialize};

use super::hash_new_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for sign-up, login and credential updates.
#[derive(Debug, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

fn require_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email must not be empty".into()));
    }
    Ok(email.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
///
/// Register a new user. The password is stored only as an Argon2id hash.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserCredentials>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let email = require_email(&input.email)?;
    let hashed_password = hash_new_password(input.password).await?;

    let user = state
        .users
        .create_user(&CreateUser {
            email,
            hashed_password,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users
///
/// Replace the authenticated user's email and password.
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UserCredentials>,
) -> AppResult<Json<UserResponse>> {
    let email = require_email(&input.email)?;
    let hashed_password = hash_new_password(input.password).await?;

    let user = state
        .users
        .update_user_credentials(
            auth.user_id,
            &UpdateUserCredentials {
                email,
                hashed_password,
            },
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = %user.id, "User credentials updated");
    Ok(Json(user.into()))
}
