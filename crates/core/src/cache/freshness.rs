//! Freshness policy
//!
//! Pure classification of a cache entry against a TTL. No I/O, no clock:
//! the caller supplies `now`.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use zipcast_domain::{CacheEntry, Freshness};

/// Classify `entry` at `now` against `ttl`.
///
/// An entry exactly `ttl` old is still fresh. An entry stamped in the future
/// (clock skew) counts as fresh.
pub fn classify(entry: Option<&CacheEntry>, now: DateTime<Utc>, ttl: Duration) -> Freshness {
    match entry {
        None => Freshness::Missing,
        Some(entry) if is_within_ttl(entry.fetched_at, now, ttl) => Freshness::Fresh,
        Some(_) => Freshness::Stale,
    }
}

fn is_within_ttl(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    // A TTL too large for TimeDelta never expires.
    TimeDelta::from_std(ttl).map_or(true, |ttl| now.signed_duration_since(fetched_at) <= ttl)
}
