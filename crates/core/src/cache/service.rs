//! Cache orchestrator - the one place cache policy is decided
//!
//! `get_or_fetch` composes the store, the freshness policy and the
//! singleflight coordinator:
//!
//! 1. look the key up (a failing store is treated as an empty one)
//! 2. classify the entry against the kind's TTL
//! 3. FRESH: return the cached payload
//! 4. MISSING / STALE: fetch through the coordinator, which also persists
//!    the new payload, then return it. The flight leader looks the key up
//!    once more first, since a flight that just finished may have filled it
//! 5. on fetch failure, serve a STALE entry if allowed and the failure is
//!    transient, otherwise propagate the fetch's error

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use zipcast_common::time::Clock;
use zipcast_domain::{
    CacheConfig, CacheEntry, CacheKey, CacheKind, CachePayload, CacheSource, Freshness, Result,
    ZipcastError,
};

use super::freshness::classify;
use super::ports::CacheStore;
use super::singleflight::FlightCoordinator;

/// TTLs per kind plus the bound on a single upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub geocode_ttl: Duration,
    pub hourly_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl CachePolicy {
    pub const fn ttl_for(&self, kind: CacheKind) -> Duration {
        match kind {
            CacheKind::Geocode => self.geocode_ttl,
            CacheKind::HourlyWeather => self.hourly_ttl,
        }
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            geocode_ttl: config.geocode_ttl(),
            hourly_ttl: config.hourly_ttl(),
            fetch_timeout: config.fetch_timeout(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

/// Result of a `get_or_fetch` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup {
    pub payload: CachePayload,
    pub source: CacheSource,
    pub fetched_at: DateTime<Utc>,
}

impl CacheLookup {
    fn from_entry(entry: CacheEntry, source: CacheSource) -> Self {
        Self { payload: entry.payload, source, fetched_at: entry.fetched_at }
    }
}

/// Read-through cache in front of the upstream providers.
pub struct CacheOrchestrator {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    flights: FlightCoordinator<CacheKey, CacheLookup>,
}

impl CacheOrchestrator {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, policy: CachePolicy) -> Self {
        Self { store, clock, policy, flights: FlightCoordinator::new() }
    }

    pub const fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Return the payload for `key`, from cache when fresh, otherwise from
    /// `fetch`.
    ///
    /// `fetch` is invoked at most once across all concurrent callers for the
    /// same key. With `allow_stale_on_error`, a transient fetch failure is
    /// answered with the stale entry (tagged `source = cache`) when one
    /// exists.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &CacheKey,
        fetch: F,
        allow_stale_on_error: bool,
    ) -> Result<CacheLookup>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CachePayload>> + Send + 'static,
    {
        let kind = key.kind();
        let entry = self.lookup(key).await;
        let state = classify(entry.as_ref(), self.clock.now_utc(), self.policy.ttl_for(kind));

        let entry = match entry {
            Some(entry) if state == Freshness::Fresh => {
                info!(kind = %kind, key = %key.value(), "cache_hit");
                return Ok(CacheLookup::from_entry(entry, CacheSource::Cache));
            }
            other => other,
        };

        match &entry {
            Some(stale) => info!(
                kind = %kind,
                key = %key.value(),
                cached_fetched_at = %stale.fetched_at,
                "cache_stale_refresh"
            ),
            None => info!(kind = %kind, key = %key.value(), "cache_miss"),
        }

        let flight = FetchFlight {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            key: key.clone(),
            ttl: self.policy.ttl_for(kind),
            timeout: self.policy.fetch_timeout,
        };
        let outcome = self.flights.run_once(key.clone(), move || flight.run(fetch)).await;

        match outcome {
            Ok(lookup) => Ok(lookup),
            Err(err) => match entry {
                Some(stale) if allow_stale_on_error && err.is_transient() => {
                    warn!(
                        kind = %kind,
                        key = %key.value(),
                        error = %err,
                        cached_fetched_at = %stale.fetched_at,
                        "cache_stale_served_on_error"
                    );
                    Ok(CacheLookup::from_entry(stale, CacheSource::Cache))
                }
                _ => Err(err),
            },
        }
    }

    /// Store lookup that degrades to a miss when the store is down, so the
    /// request still gets answered from upstream.
    async fn lookup(&self, key: &CacheKey) -> Option<CacheEntry> {
        match self.store.lookup(key).await {
            Ok(entry) => entry,
            Err(err) => {
                error!(
                    severity = "critical",
                    kind = %key.kind(),
                    key = %key.value(),
                    error = %err,
                    "cache_store_unavailable"
                );
                None
            }
        }
    }
}

/// The work done once per flight: re-check the store, then a bounded
/// upstream fetch and a single upsert of the result. Failures are never
/// written to the store.
struct FetchFlight {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    key: CacheKey,
    ttl: Duration,
    timeout: Duration,
}

impl FetchFlight {
    async fn run<F, Fut>(self, fetch: F) -> Result<CacheLookup>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachePayload>> + Send,
    {
        // The caller's first lookup can predate the upsert of a flight that
        // has since finished and left the registry.
        if let Some(entry) = self.recheck().await {
            info!(
                kind = %self.key.kind(),
                key = %self.key.value(),
                "cache_filled_by_prior_flight"
            );
            return Ok(CacheLookup::from_entry(entry, CacheSource::Cache));
        }

        let Self { store, clock, key, timeout, .. } = self;
        let payload = match tokio::time::timeout(timeout, fetch()).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(err)) => {
                warn!(
                    kind = %key.kind(),
                    key = %key.value(),
                    error = %err,
                    "upstream_fetch_failed"
                );
                return Err(err);
            }
            Err(_) => {
                let err = ZipcastError::upstream(format!(
                    "upstream fetch timed out after {}ms",
                    timeout.as_millis()
                ));
                warn!(
                    kind = %key.kind(),
                    key = %key.value(),
                    error = %err,
                    "upstream_fetch_failed"
                );
                return Err(err);
            }
        };

        if payload.kind() != key.kind() {
            return Err(ZipcastError::Internal(format!(
                "fetch for {} returned a {} payload",
                key,
                payload.kind()
            )));
        }

        let fetched_at = clock.now_utc();
        let entry = match store.upsert(&key, &payload, fetched_at).await {
            Ok(entry) => entry,
            Err(err) => {
                error!(
                    kind = %key.kind(),
                    key = %key.value(),
                    error = %err,
                    "cache_upsert_failed"
                );
                CacheEntry { key, payload, fetched_at, created_at: fetched_at }
            }
        };
        Ok(CacheLookup::from_entry(entry, CacheSource::Upstream))
    }

    /// The stored entry if it is fresh by now. A store error only costs the
    /// shortcut; the fetch goes ahead.
    async fn recheck(&self) -> Option<CacheEntry> {
        let entry = match self.store.lookup(&self.key).await {
            Ok(entry) => entry?,
            Err(err) => {
                warn!(
                    kind = %self.key.kind(),
                    key = %self.key.value(),
                    error = %err,
                    "cache_recheck_failed"
                );
                return None;
            }
        };
        match classify(Some(&entry), self.clock.now_utc(), self.ttl) {
            Freshness::Fresh => Some(entry),
            _ => None,
        }
    }
}
