//! Access-token issuance and validation.
//!
//! Access tokens are HS256-signed JWTs carrying `{iss, sub, iat, exp}`. They
//! are self-validating: no store lookup is needed, so they are kept short-lived.
//! Refresh tokens are unrelated opaque values handled by the store.

use std::fmt;

use chirpy_core::refresh_token::{DEFAULT_REFRESH_EXPIRY_DAYS, MAX_REFRESH_EXPIRY_DAYS};
use chirpy_core::types::{DbId, Timestamp};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim on every access token.
pub const ISSUER: &str = "chirpy-auth";

/// Default access token lifetime in seconds (1 hour).
pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 60 * 60;

/// Longest accepted access token lifetime in seconds (24 hours).
pub const MAX_ACCESS_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer, always [`ISSUER`].
    pub iss: String,
    /// Subject -- the user's id.
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Why an access token was not accepted (or could not be produced).
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("access token is malformed")]
    Malformed,

    #[error("access token signature does not match")]
    SignatureMismatch,

    #[error("access token has expired")]
    Expired,

    #[error("access token lifetime is out of range")]
    LifetimeOutOfRange,

    #[error("access token could not be signed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Configuration for access-token signing and refresh-token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in seconds (default: 3600).
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in days (default: 60).
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry_secs: DEFAULT_ACCESS_EXPIRY_SECS,
            refresh_token_expiry_days: DEFAULT_REFRESH_EXPIRY_DAYS,
        }
    }

    /// Access token lifetime, held to `1..=MAX_ACCESS_EXPIRY_SECS`.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_expiry_secs.clamp(1, MAX_ACCESS_EXPIRY_SECS))
    }

    /// Refresh token lifetime, held to `1..=MAX_REFRESH_EXPIRY_DAYS`.
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days.clamp(1, MAX_REFRESH_EXPIRY_DAYS))
    }

    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .finish()
    }
}

/// Issue an HS256 access token for `subject`, valid for `ttl` from now.
pub fn issue_access_token(
    subject: DbId,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, TokenError> {
    issue_access_token_at(subject, secret, ttl, Utc::now())
}

/// Issue an access token as if the current time were `now`.
pub fn issue_access_token_at(
    subject: DbId,
    secret: &[u8],
    ttl: Duration,
    now: Timestamp,
) -> Result<String, TokenError> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or(TokenError::LifetimeOutOfRange)?;
    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(TokenError::Signing)
}

/// Validate an access token and return its subject.
///
/// `jsonwebtoken` verifies the signature before it inspects any claim, so a
/// token with plausible claims but a foreign signature is always rejected as
/// [`TokenError::SignatureMismatch`]. Expiry has no leeway.
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<DbId, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;

    data.claims
        .sub
        .parse::<DbId>()
        .map_err(|_| TokenError::Malformed)
}
