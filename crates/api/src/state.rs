use std::sync::Arc;

use chirpy_db::{ChirpStore, DbPool, MemoryStore, PgStore, RefreshTokenStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (everything is behind `Arc`). The three store
/// handles usually point at the same backend object.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, immutable after startup.
    pub config: Arc<ServerConfig>,
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Chirps, the owned resources.
    pub chirps: Arc<dyn ChirpStore>,
    /// Server-tracked refresh tokens.
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl AppState {
    /// State backed by Postgres.
    pub fn postgres(pool: DbPool, config: ServerConfig) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)), config)
    }

    /// State backed by a fresh in-process store.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::from_store(Arc::new(MemoryStore::new()), config)
    }

    /// State where one backend object serves every store role.
    pub fn from_store<S>(store: Arc<S>, config: ServerConfig) -> Self
    where
        S: UserStore + ChirpStore + RefreshTokenStore + 'static,
    {
        Self {
            config: Arc::new(config),
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }
}
