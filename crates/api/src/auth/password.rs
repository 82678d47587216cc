//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

/// Plaintext behind the stand-in hash used for unknown accounts.
const DUMMY_SECRET: &str = "chirpy-unknown-account";

/// Errors from hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password must not be empty")]
    EmptyInput,

    /// Wrong password, or a stored hash that could not be used at all.
    #[error("password does not match")]
    Mismatch,

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::EmptyInput);
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// The digest comparison is constant-time. A stored hash that cannot be
/// parsed or used is logged for operators but reported to the caller as
/// [`PasswordError::Mismatch`], same as a wrong password.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return Err(PasswordError::Mismatch);
        }
    };
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            Err(PasswordError::Mismatch)
        }
    }
}

/// Spend the same Argon2 work as [`verify_password`] for an account that
/// does not exist, then report a mismatch.
///
/// The stand-in hash is computed once with the default parameters, so the
/// cost tracks real stored hashes.
pub fn verify_against_dummy(password: &str) -> PasswordError {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    let hash = DUMMY_HASH.get_or_init(|| match hash_password(DUMMY_SECRET) {
        Ok(hash) => Some(hash),
        Err(e) => {
            tracing::error!(error = %e, "Could not build stand-in password hash");
            None
        }
    });
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
    PasswordError::Mismatch
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        assert_matches!(
            verify_password("wrong-password", &hash),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("securepassword").unwrap();
        let second = hash_password("securepassword").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("securepassword", &first).is_ok());
        assert!(verify_password("securepassword", &second).is_ok());
    }

    #[test]
    fn test_empty_password_is_rejected() {
        assert_matches!(hash_password(""), Err(PasswordError::EmptyInput));
    }

    #[test]
    fn test_malformed_hash_reports_mismatch() {
        assert_matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(PasswordError::Mismatch)
        );
        assert_matches!(
            verify_password("anything", "$unknown$v=1$abc$def"),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_dummy_verification_always_mismatches() {
        assert_matches!(verify_against_dummy("guess"), PasswordError::Mismatch);
        assert_matches!(verify_against_dummy(DUMMY_SECRET), PasswordError::Mismatch);
        assert_matches!(verify_against_dummy(""), PasswordError::Mismatch);
    }
}
