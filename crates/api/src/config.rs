use std::fmt;
use std::str::FromStr;

use chirpy_core::refresh_token::{DEFAULT_REFRESH_EXPIRY_DAYS, MAX_REFRESH_EXPIRY_DAYS};

use crate::auth::jwt::{JwtConfig, DEFAULT_ACCESS_EXPIRY_SECS, MAX_ACCESS_EXPIRY_SECS};

/// Platform name that unlocks development-only endpoints such as `/admin/reset`.
pub const PLATFORM_DEV: &str = "dev";

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded once at startup.
///
/// Immutable after construction; handlers reach it through `AppState`.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deployment platform; `dev` enables destructive admin endpoints.
    pub platform: String,
    /// Postgres connection string. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Token signing and lifetime configuration.
    pub jwt: JwtConfig,
    /// Shared API key expected from the Polka payments webhook.
    pub polka_key: String,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// | Env Var                     | Required | Default                 |
    /// |-----------------------------|----------|-------------------------|
    /// | `HOST`                      | no       | `0.0.0.0`               |
    /// | `PORT`                      | no       | `8080`                  |
    /// | `CORS_ORIGINS`              | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | no       | `30`                    |
    /// | `PLATFORM`                  | **yes**  | --                      |
    /// | `DATABASE_URL`              | no       | in-memory store         |
    /// | `JWT_SECRET`                | **yes**  | --                      |
    /// | `JWT_ACCESS_EXPIRY_SECS`    | no       | `3600`                  |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS` | no       | `60`                    |
    /// | `POLKA_KEY`                 | **yes**  | --                      |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&get, "PORT", 8080u16, "u16")?;

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&get, "REQUEST_TIMEOUT_SECS", 30u64, "u64")?;

        let platform = required("PLATFORM")?;
        let database_url = get("DATABASE_URL");

        let access_token_expiry_secs = parse_or(
            &get,
            "JWT_ACCESS_EXPIRY_SECS",
            DEFAULT_ACCESS_EXPIRY_SECS,
            "i64",
        )?;
        let refresh_token_expiry_days = parse_or(
            &get,
            "REFRESH_TOKEN_EXPIRY_DAYS",
            DEFAULT_REFRESH_EXPIRY_DAYS,
            "i64",
        )?;
        check_range(
            "JWT_ACCESS_EXPIRY_SECS",
            access_token_expiry_secs,
            MAX_ACCESS_EXPIRY_SECS,
            "number of seconds between 1 and 86400",
        )?;
        check_range(
            "REFRESH_TOKEN_EXPIRY_DAYS",
            refresh_token_expiry_days,
            MAX_REFRESH_EXPIRY_DAYS,
            "number of days between 1 and 365",
        )?;
        // A refresh token must outlive every access token it mints.
        let refresh_secs = refresh_token_expiry_days.checked_mul(24 * 60 * 60);
        if refresh_secs.map_or(true, |secs| secs <= access_token_expiry_secs) {
            return Err(ConfigError::Invalid {
                name: "REFRESH_TOKEN_EXPIRY_DAYS",
                expected: "lifetime longer than JWT_ACCESS_EXPIRY_SECS",
                value: refresh_token_expiry_days.to_string(),
            });
        }

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            access_token_expiry_secs,
            refresh_token_expiry_days,
        };
        let polka_key = required("POLKA_KEY")?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            platform,
            database_url,
            jwt,
            polka_key,
        })
    }

    /// Whether development-only endpoints are enabled.
    pub fn is_dev(&self) -> bool {
        self.platform == PLATFORM_DEV
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("platform", &self.platform)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("jwt", &self.jwt)
            .field("polka_key", &"<redacted>")
            .finish()
    }
}

/// Reject lifetimes outside `1..=max`.
fn check_range(
    name: &'static str,
    value: i64,
    max: i64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        name,
        expected,
        value: value.to_string(),
    })
}

fn parse_or<T, G>(
    get: &G,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}
