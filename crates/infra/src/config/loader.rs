//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if one exists
//! 2. Loads the file named by `ZIPCAST_CONFIG`, or the first file found by
//!    [`probe_config_paths`], or falls back to defaults
//! 3. Applies `ZIPCAST_*` environment overrides on top
//! 4. Validates the result
//!
//! ## Environment Variables
//! - `ZIPCAST_CONFIG`: Explicit config file path (`.toml` or `.json`)
//! - `ZIPCAST_HOST` / `ZIPCAST_PORT`: Listener address
//! - `ZIPCAST_DB_PATH`: SQLite database file path
//! - `ZIPCAST_GEOCODE_TTL_SECS` / `ZIPCAST_HOURLY_TTL_SECS`: Per-kind TTLs
//! - `ZIPCAST_SERVE_STALE_ON_ERROR`: Serve stale entries on upstream failure
//! - `ZIPCAST_ZIPCODESTACK_API_KEY` (or `ZIPCODESTACK_API_KEY`): Geocoder key
//! - `ZIPCAST_ZIPCODESTACK_URL` / `ZIPCAST_WEATHER_GOV_URL`: Upstream bases
//! - `ZIPCAST_USER_AGENT`: User agent sent upstream
//! - `ZIPCAST_LOG_LEVEL` / `ZIPCAST_LOG_JSON`: Tracing output
//!
//! ## File Locations
//! Without `ZIPCAST_CONFIG` the loader probes, in order:
//! 1. `./zipcast.toml`
//! 2. `./config/zipcast.toml`
//! 3. `./zipcast.json`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use zipcast_domain::{Config, Result, ZipcastError};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ZIPCAST_CONFIG";

/// Load configuration from file (if any) and environment.
///
/// # Errors
/// Returns `ZipcastError::Config` if:
/// - `ZIPCAST_CONFIG` names a file that does not exist
/// - The file format is invalid
/// - An override has an unparseable value
/// - The merged configuration fails validation
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => load_from_file(Some(PathBuf::from(path)))?,
        _ => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::info!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations and returns an error
/// when none exists. Format is detected by extension.
///
/// # Errors
/// Returns `ZipcastError::Config` if the file is missing, unreadable, or
/// not valid TOML/JSON.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ZipcastError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ZipcastError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ZipcastError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration by file extension (`.toml` or `.json`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ZipcastError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ZipcastError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ZipcastError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    [cwd.join("zipcast.toml"), cwd.join("config").join("zipcast.toml"), cwd.join("zipcast.json")]
        .into_iter()
        .find(|path| path.exists())
}

/// Overlay `ZIPCAST_*` environment variables onto `config`.
///
/// Unset or empty variables leave the existing value alone.
///
/// # Errors
/// Returns `ZipcastError::Config` when a numeric variable does not parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(host) = env_string("ZIPCAST_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env_parse::<u16>("ZIPCAST_PORT")? {
        config.server.port = port;
    }
    if let Some(path) = env_string("ZIPCAST_DB_PATH") {
        config.database.path = path;
    }
    if let Some(size) = env_parse::<u32>("ZIPCAST_DB_POOL_SIZE")? {
        config.database.pool_size = size;
    }
    if let Some(ttl) = env_parse::<u64>("ZIPCAST_GEOCODE_TTL_SECS")? {
        config.cache.geocode_ttl_secs = ttl;
    }
    if let Some(ttl) = env_parse::<u64>("ZIPCAST_HOURLY_TTL_SECS")? {
        config.cache.hourly_ttl_secs = ttl;
    }
    config.cache.serve_stale_on_error =
        env_bool("ZIPCAST_SERVE_STALE_ON_ERROR", config.cache.serve_stale_on_error);

    if let Some(key) =
        env_string("ZIPCAST_ZIPCODESTACK_API_KEY").or_else(|| env_string("ZIPCODESTACK_API_KEY"))
    {
        config.upstream.zipcodestack_api_key = key;
    }
    if let Some(url) = env_string("ZIPCAST_ZIPCODESTACK_URL") {
        config.upstream.zipcodestack_base_url = url;
    }
    if let Some(url) = env_string("ZIPCAST_WEATHER_GOV_URL") {
        config.upstream.weather_gov_base_url = url;
    }
    if let Some(agent) = env_string("ZIPCAST_USER_AGENT") {
        config.upstream.user_agent = agent;
    }

    if let Some(level) = env_string("ZIPCAST_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("ZIPCAST_LOG_JSON", config.logging.json);

    Ok(())
}

/// Non-empty environment variable, trimmed.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ZipcastError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    env_string(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
