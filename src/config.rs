/*
 * Responsibility
 * - Load settings from the environment (JWKS URL, CORS allow-list, store backend, ...)
 * - Validate values up front (startup fails when something required is missing)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub jwks_url: Url,
    pub jwks_timeout_seconds: u64,
    pub token_leeway_seconds: u64,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,

    // None -> in-memory store
    pub database_url: Option<String>,
    pub attachment_base_url: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a `Config` from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwks_url = lookup("JWKS_URL").ok_or(ConfigError::Missing("JWKS_URL"))?;
        let jwks_url = Url::parse(&jwks_url).map_err(|_| ConfigError::Invalid("JWKS_URL"))?;
        if !matches!(jwks_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("JWKS_URL"));
        }

        let jwks_timeout_seconds = match lookup("JWKS_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("JWKS_TIMEOUT_SECONDS"))?,
            None => 5,
        };

        let token_leeway_seconds = match lookup("TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("TOKEN_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let auth_issuer = non_empty(lookup("AUTH_ISSUER"));
        let auth_audience = non_empty(lookup("AUTH_AUDIENCE"));
        let database_url = non_empty(lookup("DATABASE_URL"));

        let attachment_base_url = lookup("ATTACHMENT_BASE_URL")
            .ok_or(ConfigError::Missing("ATTACHMENT_BASE_URL"))?;
        let attachment_base_url = Url::parse(&attachment_base_url)
            .map_err(|_| ConfigError::Invalid("ATTACHMENT_BASE_URL"))?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwks_url,
            jwks_timeout_seconds,
            token_leeway_seconds,
            auth_issuer,
            auth_audience,
            database_url,
            attachment_base_url,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
