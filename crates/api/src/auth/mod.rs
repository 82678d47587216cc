//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`credential`] -- `Authorization` header parsing (bearer token, API key).
//! - [`jwt`] -- signed access-token issuance and validation.
//! - [`guard`] -- ownership check between an authenticated user and a resource.
//!
//! Refresh tokens are opaque and store-backed; see
//! [`chirpy_db::RefreshTokenStore`].

pub mod credential;
pub mod guard;
pub mod jwt;
pub mod password;
