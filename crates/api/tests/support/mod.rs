//! Shared harness for route tests.
//!
//! Builds the real router over a temporary SQLite database, with scripted
//! upstream providers that count their calls.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use zipcast_api::{create_app, AppContext};
use zipcast_common::time::MockClock;
use zipcast_core::{ForecastProvider, GeocodeProvider};
use zipcast_domain::{
    Config, Coordinates, GeocodeResult, HourlyForecast, HourlyPeriod, Result, ZipCode,
    ZipcastError,
};
use zipcast_infra::DbManager;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
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
        short_forecast: Some("Sunny".into()),
        wind_speed_mph: Some(8),
        wind_direction: Some("NW".into()),
        probability_of_precipitation: Some(0.0),
        relative_humidity: Some(30.0),
        icon: None,
    }
}

/// Geocoder answering every ZIP with a scripted response.
pub struct StubGeocoder {
    calls: AtomicUsize,
    response: Mutex<Result<GeocodeResult>>,
}

impl StubGeocoder {
    pub fn returning(result: GeocodeResult) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), response: Mutex::new(Ok(result)) })
    }

    pub fn failing(err: ZipcastError) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), response: Mutex::new(Err(err)) })
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

/// Forecaster echoing the requested location with a scripted outcome.
pub struct StubForecaster {
    calls: AtomicUsize,
    last_coords: Mutex<Option<Coordinates>>,
    failure: Mutex<Option<ZipcastError>>,
    temperature: Mutex<f64>,
}

impl StubForecaster {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_coords: Mutex::new(None),
            failure: Mutex::new(None),
            temperature: Mutex::new(41.0),
        })
    }

    pub fn fail_with(&self, err: ZipcastError) {
        *self.failure.lock() = Some(err);
    }

    pub fn set_temperature(&self, temperature: f64) {
        *self.temperature.lock() = temperature;
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
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        Ok(HourlyForecast {
            generated_at: t0(),
            location: coords.into(),
            periods: vec![period("2026-03-01T12:00:00Z", *self.temperature.lock())],
        })
    }
}

/// Router plus handles on everything behind it.
pub struct TestApp {
    pub router: Router,
    pub ctx: Arc<AppContext>,
    pub clock: MockClock,
    pub geocoder: Arc<StubGeocoder>,
    pub forecaster: Arc<StubForecaster>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new(geocoder: Arc<StubGeocoder>) -> Self {
        Self::with_config(geocoder, Config::default())
    }

    pub fn with_config(geocoder: Arc<StubGeocoder>, config: Config) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temporary directory");
        let db = Arc::new(
            DbManager::new(temp_dir.path().join("zipcast.db"), 2, 1_000)
                .expect("failed to open test database"),
        );
        db.run_migrations().expect("failed to run schema migrations");

        let clock = MockClock::at(t0());
        let forecaster = StubForecaster::healthy();
        let ctx = Arc::new(AppContext::from_parts(
            config,
            db,
            geocoder.clone(),
            forecaster.clone(),
            Arc::new(clock.clone()),
        ));

        Self {
            router: create_app(Arc::clone(&ctx)),
            ctx,
            clock,
            geocoder,
            forecaster,
            _temp_dir: temp_dir,
        }
    }

    /// Issue a GET and decode the JSON body (`Null` when there is none).
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub fn stored_rows(&self) -> i64 {
        let conn = self.ctx.db.get_connection().unwrap();
        conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get::<_, i64>(0))
            .unwrap()
    }
}
