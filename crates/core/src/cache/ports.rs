//! Port interface for the durable cache store
//!
//! The store is policy-free: it persists and returns entries, and leaves
//! every freshness or fallback decision to the orchestrator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use zipcast_domain::{CacheEntry, CacheKey, CachePayload, Result};

/// Durable `(kind, key) -> entry` table.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Persisted entry for `key`, or `None`. A missing key is not an error.
    ///
    /// Fails with `StoreUnavailable` on I/O failure.
    async fn lookup(&self, key: &CacheKey) -> Result<Option<CacheEntry>>;

    /// Insert or fully replace the entry for `key`.
    ///
    /// Returns the stored entry; `created_at` is preserved across
    /// replacements.
    async fn upsert(
        &self,
        key: &CacheKey,
        payload: &CachePayload,
        fetched_at: DateTime<Utc>,
    ) -> Result<CacheEntry>;
}
