//! Storage primitives for the SQLite cache database
//!
//! Provides an r2d2-based rusqlite connection pool with per-connection
//! pragmas, pool metrics and a storage error type.

pub mod error;
pub mod metrics;
pub mod sqlite;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use metrics::{PoolMetricsSnapshot, StorageMetrics};
pub use sqlite::{
    apply_connection_pragmas, HealthStatus, SqliteConnection, SqlitePool, SqlitePoolConfig,
};
