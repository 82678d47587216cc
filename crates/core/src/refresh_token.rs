//! Opaque refresh-token generation and lifecycle rules.
//!
//! A refresh token is 32 bytes from the thread-local CSPRNG, hex-encoded to a
//! 64-character lowercase string. It carries no structure of its own; the
//! owner, expiry and revocation state live in the persisted record.

use rand::RngCore;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of random bytes in a refresh token (256 bits of entropy).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token string.
pub const REFRESH_TOKEN_LEN: usize = REFRESH_TOKEN_BYTES * 2;

/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 60;

/// Longest accepted refresh token lifetime in days.
pub const MAX_REFRESH_EXPIRY_DAYS: i64 = 365;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a new refresh token value.
///
/// Collisions are not retried; the store's primary key is the backstop.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `value` has the shape of a refresh token (64 lowercase hex chars).
///
/// Used to short-circuit lookups of obviously bogus values; a well-shaped
/// value still has to exist in the store.
pub fn is_well_formed(value: &str) -> bool {
    value.len() == REFRESH_TOKEN_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state of a persisted refresh token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Revoked,
    Expired,
}

/// Classify a refresh-token record at `now`.
///
/// Revocation wins over expiry: once `revoked_at` is set the token is
/// reported as revoked no matter how much lifetime it had left.
pub fn refresh_token_state(
    expires_at: Timestamp,
    revoked_at: Option<Timestamp>,
    now: Timestamp,
) -> RefreshTokenState {
    if revoked_at.is_some() {
        RefreshTokenState::Revoked
    } else if now > expires_at {
        RefreshTokenState::Expired
    } else {
        RefreshTokenState::Active
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn generated_token_is_64_lowercase_hex_chars() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), REFRESH_TOKEN_LEN);
        assert!(is_well_formed(&token), "unexpected token shape: {token}");
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }

    #[test]
    fn well_formed_rejects_wrong_shapes() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("not-a-real-token"));
        assert!(!is_well_formed(&"A".repeat(REFRESH_TOKEN_LEN)));
        assert!(!is_well_formed(&"a".repeat(REFRESH_TOKEN_LEN + 1)));
    }

    #[test]
    fn active_before_expiry() {
        let now = Utc::now();
        let state = refresh_token_state(now + Duration::days(1), None, now);
        assert_eq!(state, RefreshTokenState::Active);
    }

    #[test]
    fn expired_after_expiry() {
        let now = Utc::now();
        let state = refresh_token_state(now - Duration::seconds(1), None, now);
        assert_eq!(state, RefreshTokenState::Expired);
    }

    #[test]
    fn revoked_wins_over_remaining_lifetime_and_expiry() {
        let now = Utc::now();
        assert_eq!(
            refresh_token_state(now + Duration::days(30), Some(now), now),
            RefreshTokenState::Revoked
        );
        assert_eq!(
            refresh_token_state(now - Duration::days(1), Some(now), now),
            RefreshTokenState::Revoked
        );
    }
}
