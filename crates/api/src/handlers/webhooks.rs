//! Inbound webhooks from the Polka payments provider.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chirpy_core::error::CoreError;
use chirpy_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::api_key::PolkaApiKey;
use crate::state::AppState;

/// The only event this service acts on.
pub const USER_UPGRADED: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: DbId,
}

/// POST /api/polka/webhooks
///
/// Events other than [`USER_UPGRADED`] are acknowledged and ignored.
pub async fn polka(
    _key: PolkaApiKey,
    State(state): State<AppState>,
    Json(input): Json<WebhookRequest>,
) -> AppResult<StatusCode> {
    if input.event != USER_UPGRADED {
        tracing::debug!(event = %input.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = input
        .data
        .map(|data| data.user_id)
        .ok_or_else(|| AppError::BadRequest("Missing data.user_id".into()))?;

    if !state.users.upgrade_to_chirpy_red(user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }

    tracing::info!(%user_id, "User upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
