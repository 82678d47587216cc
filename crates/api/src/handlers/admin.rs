//! Development-only administration endpoints.

use axum::extract::State;
use axum::Json;
use chirpy_core::error::CoreError;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    /// Number of users removed.
    pub deleted_users: u64,
}

/// POST /admin/reset
///
/// Delete every user, and with them all chirps and refresh tokens. Refused
/// unless the server runs with `PLATFORM=dev`.
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<ResetResponse>> {
    if !state.config.is_dev() {
        tracing::warn!(platform = %state.config.platform, "Refused reset outside dev");
        return Err(AppError::Core(CoreError::Forbidden(
            "Reset is only allowed in dev environment".into(),
        )));
    }

    let deleted_users = state.users.delete_all_users().await?;

    tracing::warn!(deleted_users, "All users deleted");
    Ok(Json(ResetResponse { deleted_users }))
}
