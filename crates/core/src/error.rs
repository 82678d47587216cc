use crate::types::DbId;

/// Domain failures raised by request validation and ownership checks.
///
/// Persistence failures live in `chirpy_db::StoreError`; this type only
/// carries conditions the caller can act on.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No row with this id exists for the entity.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input was well-formed JSON but breaks a domain rule.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Missing or rejected credentials.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to touch the resource.
    #[error("not permitted: {0}")]
    Forbidden(String),
}
