//! Ownership-based authorization.
//!
//! The guard only adjudicates ownership. Callers must already have validated
//! the requester's access token; nothing here looks at credentials.

use chirpy_core::error::CoreError;
use chirpy_core::types::DbId;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Forbidden,
}

/// Grant the action only if `requester` is the resource's `owner`.
pub fn authorize(requester: DbId, owner: DbId) -> Decision {
    if requester == owner {
        Decision::Authorized
    } else {
        Decision::Forbidden
    }
}

/// [`authorize`] as a `Result`, rejecting with [`CoreError::Forbidden`].
pub fn require_owner(requester: DbId, owner: DbId, action: &str) -> Result<(), CoreError> {
    match authorize(requester, owner) {
        Decision::Authorized => Ok(()),
        Decision::Forbidden => {
            tracing::debug!(%requester, %owner, action, "Ownership check failed");
            Err(CoreError::Forbidden(format!(
                "User is not authorized to {action}"
            )))
        }
    }
}
