//! SQLite connection pool
//!
//! r2d2 pool of rusqlite connections, each initialized with the pragmas from
//! [`SqlitePoolConfig`].

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::metrics::StorageMetrics;

/// Snapshot of pool health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub connections: u32,
    pub idle_connections: u32,
    pub max_connections: u32,
    pub message: Option<String>,
}

/// SQLite connection pool
///
/// - Connection pooling (default: 10 connections)
/// - WAL mode for concurrent readers
/// - Connection timeout handling with metrics
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
    metrics: Arc<StorageMetrics>,
}

impl SqlitePool {
    /// Open (creating if needed) the database at `path` and build the pool.
    ///
    /// A test connection is checked out before returning, so a path that
    /// cannot be opened fails here rather than on first use.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        let metrics = Arc::new(StorageMetrics::new(config.max_size));

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {e}"))
            })?;

        drop(pool.get().map_err(|e| {
            warn!("Failed to get test connection: {}", e);
            StorageError::Connection(format!("Failed to get test connection: {e}"))
        })?);

        info!("SQLite pool created successfully with {} connections", config.max_size);

        Ok(Self { pool, config, metrics })
    }

    /// Check out a connection, recording acquisition metrics.
    #[instrument(skip(self), fields(pool_size = self.config.max_size))]
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.metrics.record_acquired(duration_ms);
                debug!("Connection acquired in {}ms", duration_ms);
                Ok(SqliteConnection::new(conn))
            }
            Err(e) => {
                let err_str = e.to_string().to_lowercase();

                if err_str.contains("timed out") || err_str.contains("timeout") {
                    self.metrics.record_timeout();
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    let waited_ms = u64::try_from(self.config.connection_timeout.as_millis())
                        .unwrap_or(u64::MAX);
                    Err(StorageError::Timeout { waited_ms })
                } else {
                    self.metrics.record_error();
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {e}")))
                }
            }
        }
    }

    /// Report pool state and whether a connection can be checked out.
    pub fn health_check(&self) -> HealthStatus {
        let state = self.pool.state();
        let message = match self.pool.get() {
            Ok(conn) => match conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
                Ok(_) => None,
                Err(e) => Some(format!("Probe query failed: {e}")),
            },
            Err(e) => Some(format!("Pool unhealthy: {e}")),
        };

        HealthStatus {
            healthy: message.is_none(),
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_connections: self.config.max_size,
            message,
        }
    }

    /// Get the pool metrics
    pub const fn metrics(&self) -> &Arc<StorageMetrics> {
        &self.metrics
    }
}
