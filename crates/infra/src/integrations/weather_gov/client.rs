/// weather.gov hourly forecast client
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};
use zipcast_common::Clock;
use zipcast_core::ForecastProvider;
use zipcast_domain::{
    Coordinates, HourlyForecast, HourlyPeriod, Location, Result, UpstreamConfig, ZipcastError,
};

use super::types::{HourlyResponse, PointsResponse, RawPeriod};
use crate::http::{read_json, HttpClient};

const GEO_JSON: &str = "application/geo+json";

static WIND_SPEED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("WIND_SPEED_PATTERN should compile - this is a bug"));

/// Forecast provider backed by the National Weather Service API.
pub struct WeatherGovClient {
    http_client: HttpClient,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl WeatherGovClient {
    /// Create a client against `base_url` (no trailing slash needed).
    pub fn new(
        http_client: HttpClient,
        base_url: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http_client, base_url, clock }
    }

    /// Build the client and its HTTP stack from upstream settings.
    pub fn from_config(config: &UpstreamConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.weather_timeout_secs))
            .max_attempts(config.max_attempts as usize)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::new(http_client, config.weather_gov_base_url.clone(), clock))
    }

    /// Fetch and normalize the hourly forecast for `coords`.
    ///
    /// The returned forecast's `location` echoes `coords`.
    pub async fn hourly_forecast(&self, coords: Coordinates) -> Result<HourlyForecast> {
        let forecast_url = self.resolve_forecast_url(coords).await?;
        debug!(url = %forecast_url, "Resolved weather.gov hourly forecast URL");

        let request =
            self.http_client.request(Method::GET, &forecast_url).header(ACCEPT, GEO_JSON);
        let payload: HourlyResponse = self.http_client.send_json(request).await?;

        let generated_at = payload
            .generated_at()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| self.clock.now_utc());

        let periods: Vec<HourlyPeriod> =
            payload.into_periods().into_iter().filter_map(normalize_period).collect();

        info!(
            lat = coords.lat(),
            lon = coords.lon(),
            period_count = periods.len(),
            "Fetched weather.gov hourly forecast"
        );

        Ok(HourlyForecast { generated_at, location: Location::from(coords), periods })
    }

    /// Step one: the points lookup that names the grid's hourly endpoint.
    async fn resolve_forecast_url(&self, coords: Coordinates) -> Result<String> {
        let url = format!("{}/points/{}", self.base_url, coords.key_string());
        let request = self.http_client.request(Method::GET, &url).header(ACCEPT, GEO_JSON);
        let response = self.http_client.send(request).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ZipcastError::NotFound(format!(
                    "no forecast grid for {}",
                    coords.key_string()
                )));
            }
            StatusCode::BAD_REQUEST => {
                return Err(ZipcastError::InvalidInput(format!(
                    "weather.gov rejected coordinates {}",
                    coords.key_string()
                )));
            }
            _ => {}
        }

        let points: PointsResponse = read_json(response).await?;
        let properties = points.properties.ok_or_else(|| {
            ZipcastError::upstream("weather.gov points payload missing properties")
        })?;

        properties.forecast_hourly.filter(|url| !url.is_empty()).ok_or_else(|| {
            ZipcastError::upstream("weather.gov points payload missing forecastHourly")
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherGovClient {
    async fn fetch_hourly(&self, coords: Coordinates) -> Result<HourlyForecast> {
        self.hourly_forecast(coords).await
    }
}

/// Parse a weather.gov wind speed string into whole mph.
///
/// `"5 mph"` gives 5; a range like `"5 to 10 mph"` gives the mean of its
/// first two numbers, rounded half to even. No digits gives `None`.
pub fn parse_wind_speed_mph(wind_speed: &str) -> Option<u32> {
    let mut speeds =
        WIND_SPEED_PATTERN.find_iter(wind_speed).filter_map(|m| m.as_str().parse::<u32>().ok());

    let first = speeds.next()?;
    match speeds.next() {
        None => Some(first),
        Some(second) => {
            let mean = (f64::from(first) + f64::from(second)) / 2.0;
            Some(mean.round_ties_even() as u32)
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.with_timezone(&Utc))
}

/// Flatten one raw period; `None` for entries that are not usable periods.
fn normalize_period(raw: serde_json::Value) -> Option<HourlyPeriod> {
    if !raw.is_object() {
        return None;
    }

    let period: RawPeriod = match serde_json::from_value(raw) {
        Ok(period) => period,
        Err(err) => {
            warn!(error = %err, "Skipping malformed weather.gov period");
            return None;
        }
    };

    let Some(start_time) = period.start_time else {
        warn!("Skipping weather.gov period without startTime");
        return None;
    };

    Some(HourlyPeriod {
        start_time,
        temperature: period.temperature,
        temperature_unit: period.temperature_unit,
        short_forecast: period.short_forecast,
        wind_speed_mph: period.wind_speed.as_deref().and_then(parse_wind_speed_mph),
        wind_direction: period.wind_direction,
        probability_of_precipitation: period.probability_of_precipitation.and_then(|m| m.value),
        relative_humidity: period.relative_humidity.and_then(|m| m.value),
        icon: period.icon,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wind_speed_single_value() {
        assert_eq!(parse_wind_speed_mph("5 mph"), Some(5));
        assert_eq!(parse_wind_speed_mph("0 mph"), Some(0));
    }

    #[test]
    fn wind_speed_range_uses_rounded_mean_of_first_two() {
        assert_eq!(parse_wind_speed_mph("5 to 10 mph"), Some(8));
        assert_eq!(parse_wind_speed_mph("10 to 15 mph"), Some(12));
        assert_eq!(parse_wind_speed_mph("10 to 20 to 90 mph"), Some(15));
    }

    #[test]
    fn wind_speed_without_digits_is_none() {
        assert_eq!(parse_wind_speed_mph(""), None);
        assert_eq!(parse_wind_speed_mph("calm"), None);
    }

    #[test]
    fn normalize_flattens_measurements_and_wind() {
        let period = normalize_period(json!({
            "number": 1,
            "startTime": "2026-03-01T10:00:00-07:00",
            "temperature": 41,
            "temperatureUnit": "F",
            "windSpeed": "5 to 10 mph",
            "windDirection": "NW",
            "shortForecast": "Sunny",
            "probabilityOfPrecipitation": {"unitCode": "wmoUnit:percent", "value": 20},
            "relativeHumidity": {"unitCode": "wmoUnit:percent", "value": null},
            "icon": "https://api.weather.gov/icons/land/day/skc?size=small"
        }))
        .expect("period normalized");

        assert_eq!(period.temperature, Some(41.0));
        assert_eq!(period.wind_speed_mph, Some(8));
        assert_eq!(period.probability_of_precipitation, Some(20.0));
        assert_eq!(period.relative_humidity, None);
        assert_eq!(period.short_forecast.as_deref(), Some("Sunny"));
    }

    #[test]
    fn normalize_skips_non_objects_and_missing_start_time() {
        assert!(normalize_period(json!("not a period")).is_none());
        assert!(normalize_period(json!({"temperature": 50})).is_none());
    }

    #[test]
    fn generated_at_parses_offsets_to_utc() {
        let ts = parse_timestamp("2026-03-01T10:00:00-07:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T17:00:00+00:00");
        assert!(parse_timestamp("yesterday").is_none());
    }
}
