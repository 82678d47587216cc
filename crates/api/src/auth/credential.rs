//! Parsing of the `Authorization` header into a typed credential.
//!
//! Two schemes are understood: `Bearer <token>` and `ApiKey <key>`. The
//! bearer error messages are matched verbatim by clients and must not change.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// A credential presented on an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("authorization header is missing")]
    MissingHeader,

    #[error("authorization header is not a bearer token")]
    NotBearerScheme,

    #[error("bearer token is empty")]
    EmptyToken,

    /// Any API-key header problem; the cases are deliberately not split.
    #[error("invalid Authorization header format")]
    InvalidFormat,
}

impl Credential {
    /// Parse whichever supported scheme the `Authorization` header carries.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, CredentialError> {
        match extract_bearer(headers) {
            Ok(token) => Ok(Credential::Bearer(token)),
            Err(CredentialError::NotBearerScheme) => extract_api_key(headers)
                .map(Credential::ApiKey)
                .map_err(|_| CredentialError::NotBearerScheme),
            Err(e) => Err(e),
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The remainder after the prefix is trimmed. A header value that is not
/// valid visible ASCII is treated as a non-bearer header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, CredentialError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(CredentialError::MissingHeader)?;
    let value = value
        .to_str()
        .map_err(|_| CredentialError::NotBearerScheme)?;
    if value.is_empty() {
        return Err(CredentialError::MissingHeader);
    }

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(CredentialError::NotBearerScheme)?
        .trim();
    if token.is_empty() {
        return Err(CredentialError::EmptyToken);
    }
    Ok(token.to_string())
}

/// Extract the key from `Authorization: ApiKey <key>`.
///
/// Missing header, wrong scheme and empty key all fail with
/// [`CredentialError::InvalidFormat`]. The key is returned untrimmed.
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, CredentialError> {
    let key = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(API_KEY_PREFIX))
        .filter(|key| !key.is_empty())
        .ok_or(CredentialError::InvalidFormat)?;
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::header::CONTENT_TYPE;
    use axum::http::HeaderValue;

    use super::*;

    fn auth_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_extraction_table() {
        let mut no_auth = HeaderMap::new();
        no_auth.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let cases: Vec<(&str, HeaderMap, Result<&str, &str>)> = vec![
            ("valid token", auth_headers("Bearer abc"), Ok("abc")),
            (
                "missing header",
                no_auth,
                Err("authorization header is missing"),
            ),
            (
                "no bearer prefix",
                auth_headers("abc"),
                Err("authorization header is not a bearer token"),
            ),
            (
                "empty after prefix",
                auth_headers("Bearer "),
                Err("bearer token is empty"),
            ),
        ];

        for (name, headers, expected) in cases {
            let got = extract_bearer(&headers);
            match expected {
                Ok(token) => assert_eq!(got.as_deref(), Ok(token), "case: {name}"),
                Err(message) => {
                    let err = got.expect_err(name);
                    assert_eq!(err.to_string(), message, "case: {name}");
                }
            }
        }
    }

    #[test]
    fn bearer_token_is_trimmed() {
        let headers = auth_headers("Bearer   padded.token  ");
        assert_eq!(extract_bearer(&headers).unwrap(), "padded.token");
    }

    #[test]
    fn bearer_prefix_is_case_sensitive() {
        let headers = auth_headers("bearer abc");
        assert_eq!(extract_bearer(&headers), Err(CredentialError::NotBearerScheme));
    }

    #[test]
    fn whitespace_only_bearer_is_empty() {
        let headers = auth_headers("Bearer    ");
        assert_eq!(extract_bearer(&headers), Err(CredentialError::EmptyToken));
    }

    #[test]
    fn api_key_extraction() {
        let headers = auth_headers("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            extract_api_key(&headers).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
    }

    #[test]
    fn api_key_failures_are_indistinguishable() {
        let cases = [
            HeaderMap::new(),
            auth_headers("Bearer abc"),
            auth_headers("ApiKey "),
            auth_headers("apikey abc"),
        ];
        for headers in cases {
            assert_eq!(
                extract_api_key(&headers),
                Err(CredentialError::InvalidFormat)
            );
        }
    }

    #[test]
    fn credential_from_headers_picks_scheme() {
        assert_eq!(
            Credential::from_headers(&auth_headers("Bearer tok")),
            Ok(Credential::Bearer("tok".into()))
        );
        assert_eq!(
            Credential::from_headers(&auth_headers("ApiKey key")),
            Ok(Credential::ApiKey("key".into()))
        );
        assert_eq!(
            Credential::from_headers(&auth_headers("Basic dXNlcjpwYXNz")),
            Err(CredentialError::NotBearerScheme)
        );
        assert_eq!(
            Credential::from_headers(&HeaderMap::new()),
            Err(CredentialError::MissingHeader)
        );
    }
}
