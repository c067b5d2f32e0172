//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_PATH, DEFAULT_HOST, DEFAULT_POOL_SIZE, DEFAULT_PORT,
    DEFAULT_USER_AGENT, GEOCODE_HTTP_TIMEOUT_SECS, GEOCODE_TTL_SECS, HOURLY_TTL_SECS,
    UPSTREAM_FETCH_TIMEOUT_SECS, UPSTREAM_MAX_ATTEMPTS, WEATHER_GOV_BASE_URL,
    WEATHER_HTTP_TIMEOUT_SECS, ZIPCODESTACK_BASE_URL,
};
use crate::errors::{Result, ZipcastError};

/// Application configuration
///
/// Every section falls back to its defaults, so a config file only needs
/// to mention what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

/// Freshness and fallback policy for the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub geocode_ttl_secs: u64,
    pub hourly_ttl_secs: u64,
    /// Upper bound on one whole upstream fetch, retries included.
    pub fetch_timeout_secs: u64,
    pub serve_stale_on_error: bool,
}

/// Upstream API endpoints and HTTP behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub zipcodestack_base_url: String,
    #[serde(skip_serializing)]
    pub zipcodestack_api_key: String,
    pub weather_gov_base_url: String,
    pub user_agent: String,
    pub geocode_timeout_secs: u64,
    pub weather_timeout_secs: u64,
    pub max_attempts: u32,
}

/// Tracing output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_PATH.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geocode_ttl_secs: GEOCODE_TTL_SECS,
            hourly_ttl_secs: HOURLY_TTL_SECS,
            fetch_timeout_secs: UPSTREAM_FETCH_TIMEOUT_SECS,
            serve_stale_on_error: true,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            zipcodestack_base_url: ZIPCODESTACK_BASE_URL.to_string(),
            zipcodestack_api_key: String::new(),
            weather_gov_base_url: WEATHER_GOV_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocode_timeout_secs: GEOCODE_HTTP_TIMEOUT_SECS,
            weather_timeout_secs: WEATHER_HTTP_TIMEOUT_SECS,
            max_attempts: UPSTREAM_MAX_ATTEMPTS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl CacheConfig {
    pub const fn geocode_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_ttl_secs)
    }

    pub const fn hourly_ttl(&self) -> Duration {
        Duration::from_secs(self.hourly_ttl_secs)
    }

    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Config {
    /// Rejects settings the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ZipcastError::Config("server.port must be non-zero".into()));
        }
        if self.database.path.trim().is_empty() {
            return Err(ZipcastError::Config("database.path must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(ZipcastError::Config("database.pool_size must be at least 1".into()));
        }
        if self.cache.geocode_ttl_secs == 0 || self.cache.hourly_ttl_secs == 0 {
            return Err(ZipcastError::Config("cache TTLs must be positive".into()));
        }
        if self.cache.fetch_timeout_secs == 0 {
            return Err(ZipcastError::Config("cache.fetch_timeout_secs must be positive".into()));
        }
        if self.upstream.max_attempts == 0 {
            return Err(ZipcastError::Config("upstream.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
