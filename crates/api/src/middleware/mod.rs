//! Request extractors that authenticate the caller.
//!
//! - [`auth::AuthUser`] -- the user behind a JWT access token.
//! - [`api_key::PolkaApiKey`] -- proof that the Polka webhook sent the request.

pub mod api_key;
pub mod auth;
