//! In-memory `CacheStore` with call counters and failure switches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use zipcast_core::CacheStore;
use zipcast_domain::{CacheEntry, CacheKey, CachePayload, Result, ZipcastError};

#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    lookups: AtomicUsize,
    upserts: AtomicUsize,
    fail_lookups: AtomicBool,
    fail_upserts: AtomicBool,
    hidden_lookups: AtomicUsize,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, entry: CacheEntry) {
        self.entries.lock().insert(entry.key.clone(), entry);
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    /// The next `count` lookups report a miss whatever is stored.
    pub fn hide_next_lookups(&self, count: usize) {
        self.hidden_lookups.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(ZipcastError::StoreUnavailable("disk I/O error".into()));
        }
        let hidden = self
            .hidden_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if hidden {
            return Ok(None);
        }
        Ok(self.get(key))
    }

    async fn upsert(
        &self,
        key: &CacheKey,
        payload: &CachePayload,
        fetched_at: DateTime<Utc>,
    ) -> Result<CacheEntry> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(ZipcastError::StoreUnavailable("database is locked".into()));
        }

        let mut entries = self.entries.lock();
        let created_at = entries.get(key).map_or(fetched_at, |existing| existing.created_at);
        let entry =
            CacheEntry { key: key.clone(), payload: payload.clone(), fetched_at, created_at };
        entries.insert(key.clone(), entry.clone());
        Ok(entry)
    }
}
