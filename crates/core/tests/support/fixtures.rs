//! Payload and entry builders.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use zipcast_common::time::MockClock;
use zipcast_core::{CacheOrchestrator, CachePolicy};
use zipcast_domain::{
    CacheEntry, CacheKey, CachePayload, Coordinates, GeocodeResult, HourlyForecast, HourlyPeriod,
    ZipCode,
};

use super::repositories::InMemoryCacheStore;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn orchestrator(store: &Arc<InMemoryCacheStore>, clock: &MockClock) -> CacheOrchestrator {
    orchestrator_with(store, clock, CachePolicy::default())
}

pub fn orchestrator_with(
    store: &Arc<InMemoryCacheStore>,
    clock: &MockClock,
    policy: CachePolicy,
) -> CacheOrchestrator {
    CacheOrchestrator::new(store.clone(), Arc::new(clock.clone()), policy)
}

pub fn zip_key(zip: &str) -> CacheKey {
    CacheKey::geocode(&ZipCode::parse(zip).unwrap())
}

pub fn hourly_key(lat: f64, lon: f64) -> CacheKey {
    CacheKey::hourly(&Coordinates::new(lat, lon).unwrap())
}

pub fn new_york() -> GeocodeResult {
    GeocodeResult {
        zip: "10001".into(),
        lat: 40.7506,
        lon: -73.9972,
        city: "New York".into(),
        state: "NY".into(),
    }
}

pub fn golden() -> GeocodeResult {
    GeocodeResult {
        zip: "80401".into(),
        lat: 39.7555,
        lon: -105.2211,
        city: "Golden".into(),
        state: "CO".into(),
    }
}

pub fn period(start_time: &str, temperature: f64) -> HourlyPeriod {
    HourlyPeriod {
        start_time: start_time.into(),
        temperature: Some(temperature),
        temperature_unit: Some("F".into()),
        short_forecast: Some("Partly Cloudy".into()),
        wind_speed_mph: Some(10),
        wind_direction: Some("W".into()),
        probability_of_precipitation: Some(20.0),
        relative_humidity: Some(45.0),
        icon: None,
    }
}

pub fn forecast_payload(lat: f64, lon: f64, temperature: f64) -> CachePayload {
    CachePayload::HourlyWeather(HourlyForecast {
        generated_at: t0(),
        location: Coordinates::new(lat, lon).unwrap().normalized().into(),
        periods: vec![period("2026-03-01T12:00:00Z", temperature)],
    })
}

pub fn entry(key: CacheKey, payload: CachePayload, fetched_at: DateTime<Utc>) -> CacheEntry {
    CacheEntry { key, payload, fetched_at, created_at: fetched_at }
}
