//! SQLite-backed durable cache store.
//!
//! Implements the `CacheStore` port over the `cache_entries` table. All
//! database operations run in `spawn_blocking` to avoid blocking the async
//! runtime.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use tracing::warn;
use zipcast_core::CacheStore;
use zipcast_domain::{CacheEntry, CacheKey, CachePayload, Result, ZipcastError};

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite-backed `(kind, key) -> entry` store.
///
/// Policy-free: freshness and fallback decisions belong to the orchestrator.
pub struct SqliteCacheStore {
    db: Arc<DbManager>,
}

impl SqliteCacheStore {
    /// Create a new store over a migrated database.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let db = Arc::clone(&self.db);
        let key = key.clone();

        task::spawn_blocking(move || -> Result<Option<CacheEntry>> {
            let conn = db.get_connection()?;
            let Some(row) = query_entry(&conn, &key).map_err(map_sql_error)? else {
                return Ok(None);
            };
            Ok(decode_row(key, row))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert(
        &self,
        key: &CacheKey,
        payload: &CachePayload,
        fetched_at: DateTime<Utc>,
    ) -> Result<CacheEntry> {
        if payload.kind() != key.kind() {
            return Err(ZipcastError::Internal(format!(
                "refusing to store {} payload under {key}",
                payload.kind()
            )));
        }

        let payload_json = serde_json::to_string(payload).map_err(InfraError::from)?;
        let db = Arc::clone(&self.db);
        let key = key.clone();
        let payload = payload.clone();

        task::spawn_blocking(move || -> Result<CacheEntry> {
            let conn = db.get_connection()?;
            let fetched_ms = fetched_at.timestamp_millis();
            let created_ms =
                upsert_entry(&conn, &key, &payload_json, fetched_ms).map_err(map_sql_error)?;

            Ok(CacheEntry {
                key,
                payload,
                fetched_at: millis_to_datetime(fetched_ms).unwrap_or(fetched_at),
                created_at: millis_to_datetime(created_ms).unwrap_or(fetched_at),
            })
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

struct EntryRow {
    payload_json: String,
    fetched_at: i64,
    created_at: i64,
}

fn query_entry(conn: &Connection, key: &CacheKey) -> rusqlite::Result<Option<EntryRow>> {
    conn.query_row(
        "SELECT payload_json, fetched_at, created_at
         FROM cache_entries
         WHERE kind = ?1 AND cache_key = ?2",
        params![key.kind().as_str(), key.value()],
        |row| {
            Ok(EntryRow {
                payload_json: row.get(0)?,
                fetched_at: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .optional()
}

/// Insert or replace the payload for `key`, keeping the original
/// `created_at`. Returns the row's `created_at` in epoch milliseconds.
fn upsert_entry(
    conn: &Connection,
    key: &CacheKey,
    payload_json: &str,
    fetched_at_ms: i64,
) -> rusqlite::Result<i64> {
    conn.query_row(
        "INSERT INTO cache_entries (kind, cache_key, payload_json, fetched_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(kind, cache_key) DO UPDATE SET
             payload_json = excluded.payload_json,
             fetched_at = excluded.fetched_at
         RETURNING created_at",
        params![key.kind().as_str(), key.value(), payload_json, fetched_at_ms],
        |row| row.get(0),
    )
}

/// Turn a raw row into an entry, or `None` if the row cannot be trusted.
fn decode_row(key: CacheKey, row: EntryRow) -> Option<CacheEntry> {
    let payload = match serde_json::from_str::<CachePayload>(&row.payload_json) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(kind = %key.kind(), key = key.value(), error = %err, "cache_entry_corrupt");
            return None;
        }
    };

    if payload.kind() != key.kind() {
        warn!(
            kind = %key.kind(),
            key = key.value(),
            payload_kind = %payload.kind(),
            "cache_entry_corrupt"
        );
        return None;
    }

    let (Some(fetched_at), Some(created_at)) =
        (millis_to_datetime(row.fetched_at), millis_to_datetime(row.created_at))
    else {
        warn!(
            kind = %key.kind(),
            key = key.value(),
            fetched_at = row.fetched_at,
            "cache_entry_corrupt"
        );
        return None;
    };

    Some(CacheEntry { key, payload, fetched_at, created_at })
}

fn millis_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

fn map_sql_error(err: rusqlite::Error) -> ZipcastError {
    ZipcastError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> ZipcastError {
    if err.is_cancelled() {
        ZipcastError::StoreUnavailable("blocking task cancelled".into())
    } else {
        ZipcastError::StoreUnavailable(format!("blocking task panicked: {err}"))
    }
}

// ============================================================================
// Tests
// ============================================================================
