//! Repository for the `refresh_tokens` table.

use chirpy_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::refresh_token::RefreshToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "token, user_id, created_at, updated_at, expires_at, revoked_at";

/// Provides create / lookup / revoke operations for refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Insert a new refresh token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        token: &str,
        user_id: DbId,
        expires_at: Timestamp,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a refresh token regardless of its state.
    pub async fn find(pool: &PgPool, token: &str) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token = $1");
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Read a refresh token under a `FOR SHARE` row lock.
    ///
    /// Must be called inside a transaction: a concurrent [`Self::revoke`]
    /// blocks until that transaction ends, so a redeem that has read the row
    /// as active finishes before the revocation commits.
    pub async fn find_for_share(
        conn: &mut PgConnection,
        token: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token = $1 FOR SHARE");
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Revoke a refresh token. Returns `true` if the row transitioned to revoked.
    ///
    /// Already-revoked and unknown tokens are left untouched.
    pub async fn revoke(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), updated_at = NOW()
             WHERE token = $1 AND revoked_at IS NULL",
        )
        .bind(token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
