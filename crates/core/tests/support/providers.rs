//! Scripted upstream providers.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use zipcast_core::{ForecastProvider, GeocodeProvider};
use zipcast_domain::{
    Coordinates, GeocodeResult, HourlyForecast, HourlyPeriod, Result, ZipCode, ZipcastError,
};

/// Geocoder that answers every ZIP with a configurable result.
pub struct StubGeocoder {
    calls: AtomicUsize,
    response: Mutex<Result<GeocodeResult>>,
}

impl StubGeocoder {
    pub fn returning(result: GeocodeResult) -> Self {
        Self { calls: AtomicUsize::new(0), response: Mutex::new(Ok(result)) }
    }

    pub fn failing(err: ZipcastError) -> Self {
        Self { calls: AtomicUsize::new(0), response: Mutex::new(Err(err)) }
    }

    pub fn respond_with(&self, response: Result<GeocodeResult>) {
        *self.response.lock() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeProvider for StubGeocoder {
    async fn fetch_geocode(&self, _zip: &ZipCode) -> Result<GeocodeResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().clone()
    }
}

/// Forecaster that echoes the requested location and serves scripted
/// periods.
pub struct StubForecaster {
    calls: AtomicUsize,
    last_coords: Mutex<Option<Coordinates>>,
    response: Mutex<Result<(DateTime<Utc>, Vec<HourlyPeriod>)>>,
}

impl StubForecaster {
    pub fn returning(generated_at: DateTime<Utc>, periods: Vec<HourlyPeriod>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_coords: Mutex::new(None),
            response: Mutex::new(Ok((generated_at, periods))),
        }
    }

    pub fn respond_with(&self, response: Result<(DateTime<Utc>, Vec<HourlyPeriod>)>) {
        *self.response.lock() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_coords(&self) -> Option<Coordinates> {
        *self.last_coords.lock()
    }
}

#[async_trait]
impl ForecastProvider for StubForecaster {
    async fn fetch_hourly(&self, coords: Coordinates) -> Result<HourlyForecast> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_coords.lock() = Some(coords);
        let (generated_at, periods) = self.response.lock().clone()?;
        Ok(HourlyForecast { generated_at, location: coords.into(), periods })
    }
}
