//! Per-connection SQLite pragmas

use rusqlite::Connection;

use super::config::SqlitePoolConfig;
use crate::storage::error::{StorageError, StorageResult};

/// Configure a freshly opened pool connection.
///
/// WAL lets lookups proceed while an upsert is committing; `synchronous =
/// NORMAL` is durable across process crashes in WAL mode. Foreign keys are
/// off by default in SQLite and must be enabled per connection.
pub fn apply_connection_pragmas(conn: &Connection, config: &SqlitePoolConfig) -> StorageResult<()> {
    if config.enable_wal {
        // journal_mode answers with the resulting mode, so it needs the checked variant.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|e| StorageError::Query(format!("Failed to enable WAL: {e}")))?;
    }

    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(|e| StorageError::Query(format!("Failed to set synchronous: {e}")))?;

    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| StorageError::Query(format!("Failed to enable foreign keys: {e}")))?;

    conn.busy_timeout(config.busy_timeout)
        .map_err(|e| StorageError::Query(format!("Failed to set busy timeout: {e}")))
}
