// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Length of generated bearer tokens unless `TOKEN_LENGTH` overrides it.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Number of letters in a generated bearer token
    pub token_length: usize,
    /// How long in-flight requests may run after a shutdown signal
    pub shutdown_grace: Duration,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            database_url: "postgres://localhost/easyalert_test".to_string(),
            database_max_connections: 2,
            token_length: DEFAULT_TOKEN_LENGTH,
            shutdown_grace: Duration::from_secs(1),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = required("PORT")?;
        let port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT", port))?;

        let token_length = optional_parsed("TOKEN_LENGTH", DEFAULT_TOKEN_LENGTH)?;
        if token_length == 0 {
            return Err(ConfigError::Invalid("TOKEN_LENGTH", "0".to_string()));
        }

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            database_max_connections: optional_parsed(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            token_length,
            shutdown_grace: Duration::from_secs(optional_parsed(
                "SHUTDOWN_GRACE_SECONDS",
                DEFAULT_SHUTDOWN_GRACE_SECONDS,
            )?),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional_parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
