//! Route definitions for `/admin`.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /reset  -> reset (dev platform only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/reset", post(admin::reset))
}
