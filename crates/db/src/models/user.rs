//! User entity model and DTOs.

use chirpy_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses
/// directly; the HTTP layer maps it to its own response type.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub hashed_password: String,
}

/// DTO for replacing a user's login credentials.
#[derive(Debug, Clone)]
pub struct UpdateUserCredentials {
    pub email: String,
    pub hashed_password: String,
}
