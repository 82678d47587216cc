//! Refresh token model.

use chirpy_core::refresh_token::{refresh_token_state, RefreshTokenState};
use chirpy_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A refresh token row from the `refresh_tokens` table.
///
/// Rows are only ever marked revoked, never deleted.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl RefreshToken {
    /// Lifecycle state of this record at `now`.
    pub fn state_at(&self, now: Timestamp) -> RefreshTokenState {
        refresh_token_state(self.expires_at, self.revoked_at, now)
    }
}
