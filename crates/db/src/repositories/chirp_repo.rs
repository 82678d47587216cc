//! Repository for the `chirps` table.

use chirpy_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::chirp::{Chirp, CreateChirp};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, updated_at, body, user_id";

/// Provides CRUD operations for chirps.
pub struct ChirpRepo;

impl ChirpRepo {
    /// Insert a new chirp, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateChirp) -> Result<Chirp, sqlx::Error> {
        let query = format!(
            "INSERT INTO chirps (id, body, user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chirp>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.body)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a chirp by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chirp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chirps WHERE id = $1");
        sqlx::query_as::<_, Chirp>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up only the owner of a chirp.
    pub async fn find_owner(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT user_id FROM chirps WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all chirps, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Chirp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chirps ORDER BY created_at ASC");
        sqlx::query_as::<_, Chirp>(&query).fetch_all(pool).await
    }

    /// List the chirps of one author, oldest first.
    pub async fn list_by_author(pool: &PgPool, user_id: DbId) -> Result<Vec<Chirp>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chirps WHERE user_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Chirp>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a chirp. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
