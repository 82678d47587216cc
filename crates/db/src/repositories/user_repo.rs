//! Repository for the `users` table.

use chirpy_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{CreateUser, UpdateUserCredentials, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, hashed_password, is_chirpy_red, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email violates `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, hashed_password)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.email)
            .bind(&input.hashed_password)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's email and password hash.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_credentials(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUserCredentials,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = $2,
                hashed_password = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.hashed_password)
            .fetch_optional(pool)
            .await
    }

    /// Mark a user as a Chirpy Red subscriber. Returns `true` if the user exists.
    pub async fn upgrade_to_chirpy_red(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_chirpy_red = true, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every user. Chirps and refresh tokens cascade.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
