use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zipcast_domain::{CacheSource, Coordinates, HourlyForecast, ValidationError};

use super::error::{ApiError, Lookup};
use crate::AppContext;

/// Raw query parameters. Kept as strings so a missing or non-numeric value
/// gets the same 422 body as an out-of-range one.
#[derive(Debug, Default, Deserialize)]
pub struct HourlyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// `{generated_at, location, periods, source}`
#[derive(Debug, Serialize)]
pub struct HourlyForecastResponse {
    #[serde(flatten)]
    pub forecast: HourlyForecast,
    pub source: CacheSource,
}

pub async fn hourly_forecast(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<HourlyQuery>,
) -> Result<Json<HourlyForecastResponse>, ApiError> {
    let coords = parse_coordinates(&query)?;

    let cached = ctx
        .weather
        .hourly_forecast(coords, ctx.serve_stale_on_error())
        .await
        .map_err(|err| ApiError::from_lookup(Lookup::HourlyForecast, &err))?;

    Ok(Json(HourlyForecastResponse { forecast: cached.value, source: cached.source }))
}

fn parse_coordinates(query: &HourlyQuery) -> Result<Coordinates, ApiError> {
    let lat = parse_number(query.lat.as_deref(), ValidationError::InvalidLatitude)?;
    let lon = parse_number(query.lon.as_deref(), ValidationError::InvalidLongitude)?;

    Coordinates::new(lat, lon).map_err(|err| {
        let rejected = if err == ValidationError::InvalidLatitude { lat } else { lon };
        ApiError::validation(err, rejected)
    })
}

fn parse_number(raw: Option<&str>, invalid: ValidationError) -> Result<f64, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::validation(invalid, Value::Null))?;

    raw.parse::<f64>().map_err(|_| ApiError::validation(invalid, raw))
}
