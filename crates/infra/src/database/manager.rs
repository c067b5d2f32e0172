//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::params;
use tracing::{debug, info};
use zipcast_common::storage::{HealthStatus, SqliteConnection, SqlitePool, SqlitePoolConfig};
use zipcast_common::StorageError;
use zipcast_domain::{Result, ZipcastError};

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open the database at `db_path`, creating its parent directory and
    /// the file when missing. Does not run migrations.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32, busy_timeout_ms: u64) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ZipcastError::StoreUnavailable(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let config = SqlitePoolConfig::sized(pool_size.max(1), busy_timeout_ms);
        let pool = SqlitePool::new(&path, config).map_err(map_storage_error)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.metrics().max_pool_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(map_storage_error)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)?;
        info!(db_path = %self.path.display(), schema_version = SCHEMA_VERSION, "database_migrated");
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe the pool with `SELECT 1` and report its state.
    ///
    /// Fails with `StoreUnavailable` when no connection can be checked out
    /// or the probe query errors.
    pub fn health_check(&self) -> Result<HealthStatus> {
        let status = self.pool.health_check();
        let metrics = self.pool.metrics().snapshot();
        debug!(
            healthy = status.healthy,
            connections = status.connections,
            idle_connections = status.idle_connections,
            max_connections = status.max_connections,
            acquired = metrics.acquired,
            timeouts = metrics.timeouts,
            errors = metrics.errors,
            avg_acquire_ms = metrics.avg_acquire_ms,
            "database_pool_status"
        );

        match status.message {
            Some(message) => Err(ZipcastError::StoreUnavailable(message)),
            None => Ok(status),
        }
    }
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> ZipcastError {
    ZipcastError::from(InfraError::from(err))
}

fn map_storage_error(err: StorageError) -> ZipcastError {
    ZipcastError::from(InfraError::from(err))
}
