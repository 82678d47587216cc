//! Chirp entity model and DTOs.

use chirpy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A chirp row from the `chirps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chirp {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub body: String,
    pub user_id: DbId,
}

/// DTO for creating a new chirp.
#[derive(Debug, Clone)]
pub struct CreateChirp {
    pub body: String,
    pub user_id: DbId,
}
