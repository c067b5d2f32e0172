//! Port interfaces for the upstream data providers

use async_trait::async_trait;
use zipcast_domain::{Coordinates, GeocodeResult, HourlyForecast, Result, ZipCode};

/// Resolves ZIP codes to coordinates.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Fails with `NotFound` when the upstream has no match for a valid
    /// ZIP, or `UpstreamUnavailable` on network/5xx/malformed responses.
    async fn fetch_geocode(&self, zip: &ZipCode) -> Result<GeocodeResult>;
}

/// Fetches hourly forecasts for a point.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// `coords` are already normalized to cache-key precision; the returned
    /// forecast's `location` should echo them.
    async fn fetch_hourly(&self, coords: Coordinates) -> Result<HourlyForecast>;
}
