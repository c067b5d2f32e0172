//! Storage error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The pool could not be built or handed out a broken connection.
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    /// Every pooled connection stayed checked out for the whole wait.
    #[error("No database connection available after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Whether SQLite reported lock contention rather than a real fault.
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Rusqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            Self::Connection(_) | Self::Query(_) => false,
        }
    }
}
