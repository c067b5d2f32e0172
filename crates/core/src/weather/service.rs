//! Weather service - the façade route handlers call
//!
//! Builds normalized cache keys from validated inputs and routes every
//! lookup through the [`CacheOrchestrator`].

use std::sync::Arc;

use zipcast_domain::{
    CacheKey, CachePayload, Cached, Coordinates, GeocodeResult, HourlyForecast, Result, ZipCode,
    ZipcastError,
};

use super::ports::{ForecastProvider, GeocodeProvider};
use crate::cache::service::{CacheLookup, CacheOrchestrator};

pub struct WeatherService {
    orchestrator: Arc<CacheOrchestrator>,
    geocoder: Arc<dyn GeocodeProvider>,
    forecaster: Arc<dyn ForecastProvider>,
}

impl WeatherService {
    pub fn new(
        orchestrator: Arc<CacheOrchestrator>,
        geocoder: Arc<dyn GeocodeProvider>,
        forecaster: Arc<dyn ForecastProvider>,
    ) -> Self {
        Self { orchestrator, geocoder, forecaster }
    }

    /// Coordinates and place name for a ZIP code.
    pub async fn geocode_zip(
        &self,
        zip: &ZipCode,
        allow_stale_on_error: bool,
    ) -> Result<Cached<GeocodeResult>> {
        let key = CacheKey::geocode(zip);
        let geocoder = Arc::clone(&self.geocoder);
        let zip = zip.clone();

        let lookup = self
            .orchestrator
            .get_or_fetch(
                &key,
                move || async move { geocoder.fetch_geocode(&zip).await.map(CachePayload::Geocode) },
                allow_stale_on_error,
            )
            .await?;

        unpack(lookup, CachePayload::into_geocode, &key)
    }

    /// Hourly forecast for a point. Coordinates are rounded to key
    /// precision before fetching, so every caller sharing a key also shares
    /// the exact upstream request.
    pub async fn hourly_forecast(
        &self,
        coords: Coordinates,
        allow_stale_on_error: bool,
    ) -> Result<Cached<HourlyForecast>> {
        let normalized = coords.normalized();
        let key = CacheKey::hourly(&normalized);
        let forecaster = Arc::clone(&self.forecaster);

        let lookup = self
            .orchestrator
            .get_or_fetch(
                &key,
                move || async move {
                    forecaster.fetch_hourly(normalized).await.map(CachePayload::HourlyWeather)
                },
                allow_stale_on_error,
            )
            .await?;

        unpack(lookup, CachePayload::into_hourly, &key)
    }
}

fn unpack<T>(
    lookup: CacheLookup,
    extract: fn(CachePayload) -> Option<T>,
    key: &CacheKey,
) -> Result<Cached<T>> {
    let CacheLookup { payload, source, fetched_at } = lookup;
    let value = extract(payload)
        .ok_or_else(|| ZipcastError::Internal(format!("cached payload for {key} has the wrong shape")))?;
    Ok(Cached { value, source, fetched_at })
}
