//! HTTP routes.
//!
//! Handlers validate raw input, call the [`WeatherService`](zipcast_core::WeatherService)
//! and shape the response. They never touch the store or upstream clients directly.

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::utils::logging::log_requests;
use crate::AppContext;

mod error;
mod geocode;
mod health;
mod weather;

pub use error::{ApiError, Lookup};
pub use geocode::GeocodeResponse;
pub use health::HealthResponse;
pub use weather::{HourlyForecastResponse, HourlyQuery};

pub fn create_app(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/geocode/zip/{zip}", get(geocode::geocode_zip))
        .route("/api/weather/hourly", get(weather::hourly_forecast))
        .with_state(ctx)
        .layer(middleware::from_fn(log_requests))
}
