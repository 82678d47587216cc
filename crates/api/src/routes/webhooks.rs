use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/polka`.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks", post(webhooks::polka))
}
