//! Geocoding and hourly forecast lookups, served through the cache.

pub mod ports;
pub mod service;
