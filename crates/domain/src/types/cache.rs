//! Cache identity and persisted entry types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forecast::HourlyForecast;
use super::geocode::GeocodeResult;
use super::location::{Coordinates, ZipCode};
use crate::impl_domain_enum_conversions;

/// The two lookups the cache knows about. Each kind carries its own TTL and
/// key-normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    Geocode,
    HourlyWeather,
}

impl_domain_enum_conversions!(CacheKind {
    Geocode => "geocode",
    HourlyWeather => "hourly_weather",
});

/// Normalized `(kind, key)` identity of a cache line.
///
/// Only constructible from validated inputs, so two requests that mean the
/// same lookup always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: CacheKind,
    value: String,
}

impl CacheKey {
    /// GEOCODE key: the five-digit ZIP itself.
    pub fn geocode(zip: &ZipCode) -> Self {
        Self { kind: CacheKind::Geocode, value: zip.as_str().to_string() }
    }

    /// HOURLY_WEATHER key: `"{lat:.4},{lon:.4}"`.
    pub fn hourly(coords: &Coordinates) -> Self {
        Self { kind: CacheKind::HourlyWeather, value: coords.key_string() }
    }

    pub const fn kind(&self) -> CacheKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// Outcome of the freshness policy for one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Missing,
    Fresh,
    Stale,
}

impl_domain_enum_conversions!(Freshness {
    Missing => "missing",
    Fresh => "fresh",
    Stale => "stale",
});

/// Where a returned payload came from. Echoed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSource {
    Cache,
    Upstream,
}

impl_domain_enum_conversions!(CacheSource {
    Cache => "cache",
    Upstream => "upstream",
});

/// Cached payload, tagged by the shape it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CachePayload {
    Geocode(GeocodeResult),
    HourlyWeather(HourlyForecast),
}

impl CachePayload {
    pub const fn kind(&self) -> CacheKind {
        match self {
            Self::Geocode(_) => CacheKind::Geocode,
            Self::HourlyWeather(_) => CacheKind::HourlyWeather,
        }
    }

    pub fn into_geocode(self) -> Option<GeocodeResult> {
        match self {
            Self::Geocode(result) => Some(result),
            Self::HourlyWeather(_) => None,
        }
    }

    pub fn into_hourly(self) -> Option<HourlyForecast> {
        match self {
            Self::HourlyWeather(forecast) => Some(forecast),
            Self::Geocode(_) => None,
        }
    }
}

/// A persisted cache line. At most one exists per `(kind, key)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub payload: CachePayload,
    pub fetched_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub const fn kind(&self) -> CacheKind {
        self.key.kind()
    }
}

/// A value handed back to route handlers along with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub source: CacheSource,
    pub fetched_at: DateTime<Utc>,
}
