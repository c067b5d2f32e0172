//! Hourly forecast payloads, shaped for the dashboard frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::Coordinates;

/// A forecast snapshot for one (normalized) location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub generated_at: DateTime<Utc>,
    pub location: Location,
    pub periods: Vec<HourlyPeriod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinates> for Location {
    fn from(coords: Coordinates) -> Self {
        Self { lat: coords.lat(), lon: coords.lon() }
    }
}

/// One hour of forecast. Field names follow the upstream camelCase so the
/// frontend can consume the payload unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPeriod {
    pub start_time: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    #[serde(default)]
    pub short_forecast: Option<String>,
    #[serde(default)]
    pub wind_speed_mph: Option<u32>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub probability_of_precipitation: Option<f64>,
    #[serde(default)]
    pub relative_humidity: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
}
