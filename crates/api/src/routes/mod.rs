pub mod admin;
pub mod auth;
pub mod chirps;
pub mod health;
pub mod users;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                   create (public), update (requires auth)
///
/// /login                   login (public)
/// /refresh                 new access token (refresh token as bearer)
/// /revoke                  revoke refresh token (refresh token as bearer)
///
/// /chirps                  list (public), create (requires auth)
/// /chirps/{chirpID}        get (public), delete (owner only)
///
/// /polka/webhooks          payment events (API key)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .merge(auth::router())
        .nest("/chirps", chirps::router())
        .nest("/polka", webhooks::router())
}
