//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Cache freshness defaults
pub const GEOCODE_TTL_SECS: u64 = 30 * 24 * 60 * 60;
pub const HOURLY_TTL_SECS: u64 = 10 * 60;
pub const UPSTREAM_FETCH_TIMEOUT_SECS: u64 = 20;

// Cache key normalization
pub const COORDINATE_PRECISION: usize = 4;
pub const ZIP_CODE_LENGTH: usize = 5;

// Upstream endpoints
pub const ZIPCODESTACK_BASE_URL: &str = "https://api.zipcodestack.com";
pub const WEATHER_GOV_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "zipcast/0.1 (weather dashboard)";
pub const GEOCODE_HTTP_TIMEOUT_SECS: u64 = 10;
pub const WEATHER_HTTP_TIMEOUT_SECS: u64 = 15;
pub const UPSTREAM_MAX_ATTEMPTS: u32 = 3;

// Server and storage defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DB_PATH: &str = ".data/zipcast.sqlite3";
pub const DEFAULT_POOL_SIZE: u32 = 8;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;
