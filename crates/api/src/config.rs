use std::time::Duration;

use crate::auth::jwt::{parse_expiry, JwtConfig, DEFAULT_TOKEN_EXPIRY};
use crate::auth::password::HasherConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Credentials for the administrator seeded at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// Built once in `main` and shared read-only through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Token signing secret and default expiry.
    pub jwt: JwtConfig,
    /// Password hashing switch and cost.
    pub hasher: HasherConfig,
    /// Administrator to create at startup, if configured.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                             | Default                 |
    /// |-------------------------------------|-------------------------|
    /// | `HOST`                              | `0.0.0.0`               |
    /// | `PORT`                              | `3000`                  |
    /// | `CORS_ORIGINS`                      | `http://localhost:3001` |
    /// | `REQUEST_TIMEOUT_SECS`              | `30`                    |
    /// | `JWT_SECRET`                        | **required**            |
    /// | `DEFAULT_TOKEN_EXPIRATION_INTERVAL` | `2d`                    |
    /// | `ENABLE_ENCRYPTION`                 | `true`                  |
    /// | `PASSWORD_HASH_MEMORY_KIB`          | Argon2 default          |
    /// | `PASSWORD_HASH_ITERATIONS`          | Argon2 default          |
    /// | `ADMIN_EMAIL` / `ADMIN_PASSWORD`    | unset (no seeding)      |
    /// | `ADMIN_NAME`                        | `Administrator`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", get("PORT"), 3000u16)?;

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 30u64)?;

        let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let expiry_raw =
            get("DEFAULT_TOKEN_EXPIRATION_INTERVAL").unwrap_or_else(|| DEFAULT_TOKEN_EXPIRY.into());
        let default_expiry: Duration = parse_expiry(&expiry_raw).map_err(|reason| ConfigError::Invalid {
            var: "DEFAULT_TOKEN_EXPIRATION_INTERVAL",
            reason,
        })?;

        let defaults = HasherConfig::default();
        let hasher = HasherConfig {
            enabled: match get("ENABLE_ENCRYPTION") {
                Some(raw) => parse_flag("ENABLE_ENCRYPTION", &raw)?,
                None => defaults.enabled,
            },
            memory_kib: parse_or(
                "PASSWORD_HASH_MEMORY_KIB",
                get("PASSWORD_HASH_MEMORY_KIB"),
                defaults.memory_kib,
            )?,
            iterations: parse_or(
                "PASSWORD_HASH_ITERATIONS",
                get("PASSWORD_HASH_ITERATIONS"),
                defaults.iterations,
            )?,
        };

        let bootstrap_admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                name: get("ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
                email,
                password,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_EMAIL")),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig {
                secret,
                default_expiry,
            },
            hasher,
            bootstrap_admin,
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no` (case-insensitive).
fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::Invalid {
            var,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}
