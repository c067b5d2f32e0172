//! Read-through cache with TTL freshness and per-key fetch deduplication.

pub mod freshness;
pub mod ports;
pub mod service;
pub mod singleflight;
