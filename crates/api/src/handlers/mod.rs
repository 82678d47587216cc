//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate persistence to the store traits in `AppState` and map
//! errors via [`AppError`].

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod health;
pub mod users;
pub mod webhooks;

use crate::auth::password::{hash_password, PasswordError};
use crate::error::{AppError, AppResult};

/// Run CPU-heavy work (Argon2) off the async executor.
async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Blocking task failed: {e}")))
}

/// Hash a new password, rejecting an empty one with 400.
async fn hash_new_password(password: String) -> AppResult<String> {
    run_blocking(move || hash_password(&password))
        .await?
        .map_err(|e| match e {
            PasswordError::EmptyInput => AppError::BadRequest("Password must not be empty".into()),
            other => AppError::InternalError(other.to_string()),
        })
}
