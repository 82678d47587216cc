//! Handlers for the session endpoints (login, refresh, revoke).
//!
//! Login trades a password for a short-lived access token plus a long-lived
//! refresh token. Refresh and revoke take the refresh token as a bearer
//! credential.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chirpy_core::refresh_token::is_well_formed;
use chirpy_core::types::DbId;
use chirpy_db::RedeemError;
use serde::Serialize;

use super::run_blocking;
use super::users::{UserCredentials, UserResponse};
use crate::auth::credential::extract_bearer;
use crate::auth::jwt::issue_access_token;
use crate::auth::password::{verify_against_dummy, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Message for every login failure, so callers cannot tell which emails exist.
const INCORRECT_CREDENTIALS: &str = "Incorrect email or password";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response for `POST /api/login`: the user plus both tokens.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Access token (JWT).
    pub token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
}

/// Response for `POST /api/refresh`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<UserCredentials>,
) -> AppResult<Json<LoginResponse>> {
    let password = input.password;
    let Some(user) = state.users.find_user_by_email(input.email.trim()).await? else {
        // Same Argon2 cost as a real check, so response time does not reveal the email.
        let reason = run_blocking(move || verify_against_dummy(&password)).await?;
        tracing::debug!(reason = %reason, "Login for unknown email");
        return Err(AppError::unauthorized(INCORRECT_CREDENTIALS));
    };

    let hash = user.hashed_password.clone();
    if let Err(e) = run_blocking(move || verify_password(&password, &hash)).await? {
        tracing::debug!(user_id = %user.id, reason = %e, "Login rejected");
        return Err(AppError::unauthorized(INCORRECT_CREDENTIALS));
    }

    let token = mint_access_token(&state, user.id)?;
    let refresh_token = state
        .refresh_tokens
        .create_refresh_token(user.id, state.config.jwt.refresh_token_ttl())
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchange a live refresh token for a new access token. The refresh token
/// itself is left unchanged.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<TokenResponse>> {
    let presented = extract_bearer(&headers).map_err(|e| {
        tracing::debug!(reason = %e, "Refresh without usable bearer token");
        AppError::unauthorized("Couldn't find token")
    })?;

    let rejected = || AppError::unauthorized("Couldn't validate refresh token");
    if !is_well_formed(&presented) {
        tracing::debug!("Refresh with malformed token");
        return Err(rejected());
    }

    let user_id = match state.refresh_tokens.redeem_refresh_token(&presented).await {
        Ok(user_id) => user_id,
        Err(RedeemError::Store(e)) => return Err(e.into()),
        Err(e) => {
            tracing::debug!(reason = %e, "Refresh token rejected");
            return Err(rejected());
        }
    };

    let token = mint_access_token(&state, user_id)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Revoke a refresh token. Revoking an already revoked or unknown token
/// still succeeds.
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> AppResult<StatusCode> {
    let presented = extract_bearer(&headers).map_err(|e| {
        tracing::debug!(reason = %e, "Revoke without usable bearer token");
        AppError::unauthorized("Couldn't find token")
    })?;

    state.refresh_tokens.revoke_refresh_token(&presented).await?;

    tracing::info!("Refresh token revoked");
    Ok(StatusCode::NO_CONTENT)
}

fn mint_access_token(state: &AppState, user_id: DbId) -> AppResult<String> {
    let jwt = &state.config.jwt;
    issue_access_token(user_id, jwt.secret_bytes(), jwt.access_token_ttl())
        .map_err(|e| AppError::InternalError(e.to_string()))
}
