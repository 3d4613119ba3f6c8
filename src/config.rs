//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_ENVIRONMENT,
    DEFAULT_JWT_ISSUER, DEFAULT_REDIS_URL, DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS,
    DEFAULT_SELECTION_FETCH_TIMEOUT_MS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub catalog: CatalogConfig,
    pub selection: SelectionConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_hours: i64,
    pub issuer: String,
}

/// Problem catalog source
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file overriding the embedded catalog
    pub path: Option<PathBuf>,
}

/// Contest problem selection settings
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Upper bound for fetching all unsolved pools
    pub fetch_timeout: Duration,
    /// Seed for a shared deterministic generator; per-call OS seeding otherwise
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
            selection: SelectionConfig::from_env()?,
        })
    }
}

/// Read `key` and parse it, falling back to `default` when unset
fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(default),
    }
}

fn required_var(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: required_var("DATABASE_URL")?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: required_var("JWT_SECRET")?,
            access_expiry_minutes: parse_var(
                "JWT_ACCESS_EXPIRY_MINUTES",
                DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES,
            )?,
            refresh_expiry_hours: parse_var(
                "JWT_REFRESH_EXPIRY_HOURS",
                DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS,
            )?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string()),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            path: env::var("CATALOG_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        })
    }
}

impl SelectionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms: u64 =
            parse_var("SELECTION_FETCH_TIMEOUT_MS", DEFAULT_SELECTION_FETCH_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "SELECTION_FETCH_TIMEOUT_MS".to_string(),
            ));
        }

        let rng_seed = match env::var("SELECTION_RNG_SEED") {
            Ok(seed) if !seed.is_empty() => Some(
                seed.parse()
                    .map_err(|_| ConfigError::InvalidValue("SELECTION_RNG_SEED".to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            fetch_timeout: Duration::from_millis(timeout_ms),
            rng_seed,
        })
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_millis(DEFAULT_SELECTION_FETCH_TIMEOUT_MS),
            rng_seed: None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert!(!server.is_production());

        let selection = SelectionConfig::default();
        assert_eq!(selection.fetch_timeout, Duration::from_secs(3));
        assert!(selection.rng_seed.is_none());
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: u32 = parse_var("CONTEST_MAKER_TEST_SURELY_UNSET", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_required_var_missing() {
        let err = required_var("CONTEST_MAKER_TEST_SURELY_UNSET").unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref key) if key == "CONTEST_MAKER_TEST_SURELY_UNSET"));
    }

    #[test]
    fn test_production_flag_is_case_insensitive() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            environment: "Production".to_string(),
            rust_log: "info".to_string(),
        };
        assert!(server.is_production());
    }
}
