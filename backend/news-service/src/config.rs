//! Configuration management for News Service
//!
//! Settings are read from environment variables (optionally seeded from a
//! `.env` file). Every key has a development default except in production,
//! where CORS must be configured explicitly.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Deserialize)]
pub struct Config {
    // Application
    pub app_env: String,
    pub log_format: LogFormat,

    // HTTP server
    pub http_host: String,
    pub http_port: u16,
    pub http_workers: usize,
    pub cors_allowed_origins: String,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub mongodb_collection: String,
    pub mongodb_max_pool_size: u32,
    pub mongodb_connect_timeout_ms: u64,

    // Deadline applied to every store round trip
    pub request_timeout_ms: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_env", &self.app_env)
            .field("log_format", &self.log_format)
            .field("http_host", &self.http_host)
            .field("http_port", &self.http_port)
            .field("http_workers", &self.http_workers)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("mongodb_uri", &redact_uri(&self.mongodb_uri))
            .field("mongodb_database", &self.mongodb_database)
            .field("mongodb_collection", &self.mongodb_collection)
            .field("mongodb_max_pool_size", &self.mongodb_max_pool_size)
            .field("mongodb_connect_timeout_ms", &self.mongodb_connect_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and then the process environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("log_format", "pretty")?
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8080)?
            .set_default("http_workers", 4)?
            .set_default("cors_allowed_origins", "http://localhost:3000")?
            .set_default("mongodb_uri", "mongodb://localhost:27017")?
            .set_default("mongodb_database", "news")?
            .set_default("mongodb_collection", "news")?
            .set_default("mongodb_max_pool_size", 20)?
            .set_default("mongodb_connect_timeout_ms", 5_000)?
            .set_default("request_timeout_ms", 10_000)?
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.mongodb_connect_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Trimmed, non-empty CORS origins.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.http_workers == 0 {
            return Err(anyhow!("HTTP worker count must be greater than 0"));
        }

        if self.mongodb_uri.trim().is_empty() {
            return Err(anyhow!("MongoDB URI is required"));
        }

        if self.mongodb_database.trim().is_empty() || self.mongodb_collection.trim().is_empty() {
            return Err(anyhow!("MongoDB database and collection names are required"));
        }

        if self.mongodb_max_pool_size == 0 {
            return Err(anyhow!("MongoDB pool size must be greater than 0"));
        }

        if self.mongodb_connect_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(anyhow!("Timeouts must be greater than 0"));
        }

        if self.is_production() {
            if self.allowed_origins().is_empty() {
                return Err(anyhow!("CORS_ALLOWED_ORIGINS must be set in production"));
            }
            if self.allowed_origins().contains(&"*") {
                return Err(anyhow!("CORS_ALLOWED_ORIGINS cannot be '*' in production"));
            }
        }

        Ok(())
    }

    /// Log configuration details without credentials
    pub fn log_config(&self) {
        tracing::info!(
            env = %self.app_env,
            bind = %self.bind_address(),
            workers = self.http_workers,
            mongodb_uri = %redact_uri(&self.mongodb_uri),
            database = %self.mongodb_database,
            collection = %self.mongodb_collection,
            max_pool_size = self.mongodb_max_pool_size,
            request_timeout_ms = self.request_timeout_ms,
            "News service configuration"
        );
    }
}

/// Replace the user-info part of a connection string.
pub fn redact_uri(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}[REDACTED]{}", &uri[..scheme_end + 3], &uri[at..])
        }
        _ => uri.to_string(),
    }
}
