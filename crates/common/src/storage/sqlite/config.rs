//! SQLite connection pool configuration

use std::time::Duration;

/// SQLite pool configuration
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// How long to wait for a free connection
    pub connection_timeout: Duration,

    /// Busy timeout for SQLite operations
    pub busy_timeout: Duration,

    /// Enable WAL journal mode
    pub enable_wal: bool,
}

impl SqlitePoolConfig {
    /// Default settings with the given pool size and busy timeout.
    pub fn sized(max_size: u32, busy_timeout_ms: u64) -> Self {
        Self { max_size, busy_timeout: Duration::from_millis(busy_timeout_ms), ..Self::default() }
    }
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_millis(5000),
            enable_wal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SqlitePoolConfig::default();

        assert_eq!(config.max_size, 10, "Default pool size should be 10");
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.enable_wal, "WAL mode should be enabled by default");
    }

    #[test]
    fn test_sized_overrides_only_size_and_busy_timeout() {
        let config = SqlitePoolConfig::sized(3, 250);

        assert_eq!(config.max_size, 3);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
        assert!(config.enable_wal);
    }
}
