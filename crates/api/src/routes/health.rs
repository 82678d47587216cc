use axum::{routing::get, Router};

use crate::handlers::health;
use crate::state::AppState;

/// Mount health check routes (merged at the root, path includes `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/api/healthz", get(health::healthz))
}
