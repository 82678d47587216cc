//! Domain primitives shared by the Chirpy persistence and HTTP layers.
//!
//! This crate has no internal dependencies so both `chirpy-db` and
//! `chirpy-api` can build on it.

pub mod error;
pub mod refresh_token;
pub mod types;
