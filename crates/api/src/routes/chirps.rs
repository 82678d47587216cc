//! Route definitions for the `/chirps` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::chirps;
use crate::state::AppState;

/// Routes mounted at `/chirps`.
///
/// ```text
/// GET    /            -> list_chirps
/// POST   /            -> create_chirp (requires auth)
/// GET    /{chirpID}   -> get_chirp
/// DELETE /{chirpID}   -> delete_chirp (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chirps::list_chirps).post(chirps::create_chirp))
        .route(
            "/{chirpID}",
            get(chirps::get_chirp).delete(chirps::delete_chirp),
        )
}
