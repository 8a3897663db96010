//! Server configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use archsite_core::retry::RetryPolicy;
use axum::http::HeaderValue;

use crate::auth::jwt::{AuthConfig, DEFAULT_AUDIENCE};

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How a list endpoint reacts when the store query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Report the failure to the caller.
    Surface,
    /// Log it and answer with an empty page.
    Degrade,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "degrade" => Ok(Self::Degrade),
            other => Err(format!("expected 'surface' or 'degrade', got '{other}'")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Connection settings for the two credential tiers.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Elevated credential used by admin routes (`DATABASE_URL`).
    pub service_url: Option<String>,
    /// Restricted credential used by public routes (`PUBLIC_DATABASE_URL`).
    pub public_url: Option<String>,
    pub max_connections: u32,
}

/// Server configuration.
///
/// All fields have defaults suitable for local development; production
/// overrides them through the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    /// Backoff schedule applied to every store call.
    pub retry: RetryPolicy,
    pub admin_list_policy: ErrorPolicy,
    pub public_list_policy: ErrorPolicy,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `DATABASE_URL`              | unset                   |
    /// | `PUBLIC_DATABASE_URL`       | unset                   |
    /// | `DATABASE_MAX_CONNECTIONS`  | `10`                    |
    /// | `AUTH_JWT_SECRET`           | unset                   |
    /// | `AUTH_JWT_AUDIENCE`         | `authenticated`         |
    /// | `RETRY_MAX_RETRIES`         | `3`                     |
    /// | `RETRY_BASE_DELAY_MS`       | `1000`                  |
    /// | `RETRY_MAX_DELAY_MS`        | `10000`                 |
    /// | `RETRY_BACKOFF_FACTOR`      | `2.0`                   |
    /// | `ADMIN_LIST_ERROR_POLICY`   | `surface`               |
    /// | `PUBLIC_LIST_ERROR_POLICY`  | `degrade`               |
    /// | `LOG_FORMAT`                | `pretty`                |
    ///
    /// An unset credential is not an error: the routes that need it answer
    /// 503 instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&var, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs = parse_or(&var, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let shutdown_timeout_secs = parse_or(&var, "SHUTDOWN_TIMEOUT_SECS", 30u64)?;

        let database = DatabaseConfig {
            service_url: var("DATABASE_URL"),
            public_url: var("PUBLIC_DATABASE_URL"),
            max_connections: parse_or(
                &var,
                "DATABASE_MAX_CONNECTIONS",
                archsite_db::DEFAULT_MAX_CONNECTIONS,
            )?,
        };

        let auth = AuthConfig {
            jwt_secret: var("AUTH_JWT_SECRET"),
            audience: var("AUTH_JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.into()),
        };

        let defaults = RetryPolicy::default();
        let backoff_factor = parse_or(&var, "RETRY_BACKOFF_FACTOR", defaults.backoff_factor)?;
        if !backoff_factor.is_finite() || backoff_factor < 1.0 {
            return Err(ConfigError::Invalid {
                var: "RETRY_BACKOFF_FACTOR",
                value: backoff_factor.to_string(),
                reason: "must be a finite number >= 1.0".into(),
            });
        }
        let retry = RetryPolicy {
            max_retries: parse_or(&var, "RETRY_MAX_RETRIES", defaults.max_retries)?,
            base_delay: Duration::from_millis(parse_or(
                &var,
                "RETRY_BASE_DELAY_MS",
                defaults.base_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse_or(
                &var,
                "RETRY_MAX_DELAY_MS",
                defaults.max_delay.as_millis() as u64,
            )?),
            backoff_factor,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database,
            auth,
            retry,
            admin_list_policy: parse_or(&var, "ADMIN_LIST_ERROR_POLICY", ErrorPolicy::Surface)?,
            public_list_policy: parse_or(&var, "PUBLIC_LIST_ERROR_POLICY", ErrorPolicy::Degrade)?,
            log_format: parse_or(&var, "LOG_FORMAT", LogFormat::Pretty)?,
        })
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
