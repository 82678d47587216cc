//! API-key extractor for the Polka payments webhook.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::auth::credential::Credential;
use crate::error::AppError;
use crate::state::AppState;

/// Marker proving the request carried `Authorization: ApiKey <POLKA_KEY>`.
#[derive(Debug, Clone, Copy)]
pub struct PolkaApiKey;

impl FromRequestParts<AppState> for PolkaApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(&parts.headers, &state.config.polka_key)?;
        Ok(PolkaApiKey)
    }
}

/// Accept only an `ApiKey` credential equal to `expected`.
fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let key = match Credential::from_headers(headers) {
        Ok(Credential::ApiKey(key)) => key,
        Ok(Credential::Bearer(_)) => {
            tracing::debug!("Rejected webhook carrying a bearer token");
            return Err(AppError::unauthorized("Couldn't find api key"));
        }
        Err(e) => {
            tracing::debug!(reason = %e, "Rejected webhook without API key");
            return Err(AppError::unauthorized("Couldn't find api key"));
        }
    };

    if !keys_match(&key, expected) {
        tracing::debug!("Rejected webhook with wrong API key");
        return Err(AppError::unauthorized("API key is invalid"));
    }
    Ok(())
}

/// Compare keys without short-circuiting on the first differing byte.
fn keys_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
