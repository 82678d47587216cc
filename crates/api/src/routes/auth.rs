//! Route definitions for the session endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes merged directly into `/api`.
///
/// ```text
/// POST /login    -> login
/// POST /refresh  -> refresh
/// POST /revoke   -> revoke
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/revoke", post(auth::revoke))
}
