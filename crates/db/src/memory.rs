//! In-process store used when no database is configured, and by tests.
//!
//! All three record sets sit behind one mutex, so every trait method is a
//! single critical section. In particular redeem and revoke on the same
//! refresh token are strictly serialized.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chirpy_core::refresh_token::generate_refresh_token;
use chirpy_core::types::DbId;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::chirp::{Chirp, CreateChirp};
use crate::models::refresh_token::RefreshToken;
use crate::models::user::{CreateUser, UpdateUserCredentials, User};
use crate::store::{
    expires_after, redeem_outcome, ChirpStore, RedeemError, RefreshTokenStore, StoreError,
    UserStore,
};

#[derive(Default)]
struct Inner {
    users: HashMap<DbId, User>,
    /// Kept in insertion order so equal timestamps still list stably.
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// Store holding users, chirps and refresh tokens in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a refresh-token record as-is, e.g. one with a past expiry.
    pub fn insert_refresh_token(&self, record: RefreshToken) {
        self.lock()
            .refresh_tokens
            .insert(record.token.clone(), record);
    }

    /// Fetch a refresh-token record regardless of its state.
    pub fn refresh_token(&self, token: &str) -> Option<RefreshToken> {
        self.lock().refresh_tokens.get(token).cloned()
    }

    // Every mutation completes before the guard drops, so a poisoned lock
    // still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict(format!(
                "a user with email '{}' already exists",
                input.email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            hashed_password: input.hashed_password.clone(),
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user_credentials(
        &self,
        id: DbId,
        input: &UpdateUserCredentials,
    ) -> Result<Option<User>, StoreError> {
        let mut inner = self.lock();
        if inner
            .users
            .values()
            .any(|u| u.id != id && u.email == input.email)
        {
            return Err(StoreError::Conflict(format!(
                "a user with email '{}' already exists",
                input.email
            )));
        }
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        user.email = input.email.clone();
        user.hashed_password = input.hashed_password.clone();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_to_chirpy_red(&self, id: DbId) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(false);
        };
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_all_users(&self) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let count = inner.users.len() as u64;
        inner.users.clear();
        inner.chirps.clear();
        inner.refresh_tokens.clear();
        Ok(count)
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create_chirp(&self, input: &CreateChirp) -> Result<Chirp, StoreError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: input.body.clone(),
            user_id: input.user_id,
        };
        self.lock().chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn find_chirp(&self, id: DbId) -> Result<Option<Chirp>, StoreError> {
        Ok(self.lock().chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn list_chirps(&self, author: Option<DbId>) -> Result<Vec<Chirp>, StoreError> {
        let mut chirps: Vec<Chirp> = self
            .lock()
            .chirps
            .iter()
            .filter(|c| author.map_or(true, |user_id| c.user_id == user_id))
            .cloned()
            .collect();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn delete_chirp(&self, id: DbId) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let before = inner.chirps.len();
        inner.chirps.retain(|c| c.id != id);
        Ok(inner.chirps.len() < before)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create_refresh_token(
        &self,
        owner: DbId,
        ttl: Duration,
    ) -> Result<String, StoreError> {
        let token = generate_refresh_token();
        let now = Utc::now();
        let record = RefreshToken {
            token: token.clone(),
            user_id: owner,
            created_at: now,
            updated_at: now,
            expires_at: expires_after(now, ttl)?,
            revoked_at: None,
        };
        let mut inner = self.lock();
        if inner.refresh_tokens.contains_key(&token) {
            return Err(StoreError::Conflict("refresh token collision".into()));
        }
        inner.refresh_tokens.insert(token.clone(), record);
        Ok(token)
    }

    async fn redeem_refresh_token(&self, token: &str) -> Result<DbId, RedeemError> {
        redeem_outcome(self.lock().refresh_tokens.get(token))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(record) = inner.refresh_tokens.get_mut(token) {
            if record.revoked_at.is_none() {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
