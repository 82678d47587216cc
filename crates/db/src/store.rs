//! Store traits consumed by the HTTP layer, plus the Postgres implementation.
//!
//! The traits describe what the service needs from persistence without
//! tying handlers to a connection pool: [`PgStore`] delegates to the
//! repositories, [`crate::memory::MemoryStore`] keeps everything in-process.

use async_trait::async_trait;
use chirpy_core::refresh_token::{generate_refresh_token, RefreshTokenState};
use chirpy_core::types::{DbId, Timestamp};
use chrono::{Duration, Utc};

use crate::models::chirp::{Chirp, CreateChirp};
use crate::models::refresh_token::RefreshToken;
use crate::models::user::{CreateUser, UpdateUserCredentials, User};
use crate::repositories::{ChirpRepo, RefreshTokenRepo, UserRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested lifetime does not fit in a timestamp.
    #[error("lifetime is out of range")]
    LifetimeOutOfRange,

    /// The database rejected or failed the operation.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Reasons a refresh token cannot be redeemed.
#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token has been revoked")]
    Revoked,

    #[error("refresh token has expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for RedeemError {
    fn from(err: sqlx::Error) -> Self {
        RedeemError::Store(StoreError::Database(err))
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// User records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. Fails with a conflict if the email is taken.
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Replace email and password hash. `None` if the user does not exist.
    async fn update_user_credentials(
        &self,
        id: DbId,
        input: &UpdateUserCredentials,
    ) -> Result<Option<User>, StoreError>;

    /// Returns `false` if the user does not exist.
    async fn upgrade_to_chirpy_red(&self, id: DbId) -> Result<bool, StoreError>;

    /// Remove every user along with their chirps and refresh tokens.
    async fn delete_all_users(&self) -> Result<u64, StoreError>;
}

/// Chirp records, the owned resources of the service.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, input: &CreateChirp) -> Result<Chirp, StoreError>;

    async fn find_chirp(&self, id: DbId) -> Result<Option<Chirp>, StoreError>;

    /// Chirps oldest first, optionally restricted to one author.
    async fn list_chirps(&self, author: Option<DbId>) -> Result<Vec<Chirp>, StoreError>;

    /// Returns `false` if nothing was deleted.
    async fn delete_chirp(&self, id: DbId) -> Result<bool, StoreError>;

    /// The recorded owner of a chirp, if it exists.
    async fn find_chirp_owner(&self, id: DbId) -> Result<Option<DbId>, StoreError> {
        Ok(self.find_chirp(id).await?.map(|chirp| chirp.user_id))
    }
}

/// Long-lived opaque refresh tokens, each bound to one user.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Issue and persist a new token for `owner`, valid for `ttl`.
    async fn create_refresh_token(
        &self,
        owner: DbId,
        ttl: Duration,
    ) -> Result<String, StoreError>;

    /// Resolve a token to its owner.
    ///
    /// The lookup and the state check form one atomic step with respect to
    /// [`Self::revoke_refresh_token`]. The record is not modified.
    async fn redeem_refresh_token(&self, token: &str) -> Result<DbId, RedeemError>;

    /// Mark a token revoked. Idempotent; unknown tokens are not an error.
    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError>;
}

/// Expiry for a record created at `now` with lifetime `ttl`.
pub(crate) fn expires_after(now: Timestamp, ttl: Duration) -> Result<Timestamp, StoreError> {
    now.checked_add_signed(ttl)
        .ok_or(StoreError::LifetimeOutOfRange)
}

/// Map a loaded record (or its absence) to the redeem outcome.
pub(crate) fn redeem_outcome(record: Option<&RefreshToken>) -> Result<DbId, RedeemError> {
    let record = record.ok_or(RedeemError::NotFound)?;
    match record.state_at(Utc::now()) {
        RefreshTokenState::Active => Ok(record.user_id),
        RefreshTokenState::Revoked => Err(RedeemError::Revoked),
        RefreshTokenState::Expired => Err(RedeemError::Expired),
    }
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// Store backed by the Postgres repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for health checks.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn update_user_credentials(
        &self,
        id: DbId,
        input: &UpdateUserCredentials,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::update_credentials(&self.pool, id, input).await?)
    }

    async fn upgrade_to_chirpy_red(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(UserRepo::upgrade_to_chirpy_red(&self.pool, id).await?)
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        Ok(UserRepo::delete_all(&self.pool).await?)
    }
}

#[async_trait]
impl ChirpStore for PgStore {
    async fn create_chirp(&self, input: &CreateChirp) -> Result<Chirp, StoreError> {
        Ok(ChirpRepo::create(&self.pool, input).await?)
    }

    async fn find_chirp(&self, id: DbId) -> Result<Option<Chirp>, StoreError> {
        Ok(ChirpRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_chirps(&self, author: Option<DbId>) -> Result<Vec<Chirp>, StoreError> {
        let chirps = match author {
            Some(user_id) => ChirpRepo::list_by_author(&self.pool, user_id).await?,
            None => ChirpRepo::list(&self.pool).await?,
        };
        Ok(chirps)
    }

    async fn delete_chirp(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ChirpRepo::delete(&self.pool, id).await?)
    }

    async fn find_chirp_owner(&self, id: DbId) -> Result<Option<DbId>, StoreError> {
        Ok(ChirpRepo::find_owner(&self.pool, id).await?)
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn create_refresh_token(
        &self,
        owner: DbId,
        ttl: Duration,
    ) -> Result<String, StoreError> {
        let token = generate_refresh_token();
        let expires_at = expires_after(Utc::now(), ttl)?;
        RefreshTokenRepo::create(&self.pool, &token, owner, expires_at).await?;
        tracing::debug!(user_id = %owner, %expires_at, "Refresh token issued");
        Ok(token)
    }

    async fn redeem_refresh_token(&self, token: &str) -> Result<DbId, RedeemError> {
        // Dropping the transaction before commit (e.g. on cancellation) rolls
        // it back; the read has no side effects either way.
        let mut tx = self.pool.begin().await?;
        let record = RefreshTokenRepo::find_for_share(&mut *tx, token).await?;
        let outcome = redeem_outcome(record.as_ref());
        tx.commit().await?;
        outcome
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let revoked = RefreshTokenRepo::revoke(&self.pool, token).await?;
        tracing::debug!(revoked, "Refresh token revocation processed");
        Ok(())
    }
}
