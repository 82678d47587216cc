//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chirpy_core::types::DbId;

use crate::auth::credential::extract_bearer;
use crate::auth::jwt::validate_access_token;
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
}

impl AuthUser {
    /// Authenticate from raw headers.
    ///
    /// Handlers that must validate something else first (such as a path
    /// parameter) call this directly instead of using the extractor.
    pub fn from_headers(headers: &HeaderMap, config: &ServerConfig) -> Result<Self, AppError> {
        let token = extract_bearer(headers).map_err(|e| {
            tracing::debug!(reason = %e, "Rejected request without usable bearer token");
            AppError::unauthorized("Couldn't find JWT")
        })?;

        let user_id = validate_access_token(&token, config.jwt.secret_bytes()).map_err(|e| {
            tracing::debug!(reason = %e, "Rejected access token");
            AppError::unauthorized("Couldn't validate JWT")
        })?;

        Ok(AuthUser { user_id })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, &state.config)
    }
}
