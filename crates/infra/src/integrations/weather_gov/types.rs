//! weather.gov response shapes, limited to the fields we read.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct PointsResponse {
    #[serde(default)]
    pub properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointsProperties {
    #[serde(rename = "forecastHourly", default)]
    pub forecast_hourly: Option<String>,
}

/// Kept as a raw value: a `properties` or `periods` of the wrong shape reads
/// as an empty forecast rather than a decode failure.
#[derive(Debug, Deserialize)]
pub(crate) struct HourlyResponse {
    #[serde(default)]
    pub properties: Option<Value>,
}

impl HourlyResponse {
    pub fn generated_at(&self) -> Option<&str> {
        self.properties.as_ref()?.get("generatedAt")?.as_str()
    }

    /// Raw period values, so one malformed period does not sink the rest.
    pub fn into_periods(self) -> Vec<Value> {
        match self.properties {
            Some(Value::Object(mut properties)) => match properties.remove("periods") {
                Some(Value::Array(periods)) => periods,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPeriod {
    pub start_time: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    #[serde(default)]
    pub short_forecast: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<String>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub probability_of_precipitation: Option<Measurement>,
    #[serde(default)]
    pub relative_humidity: Option<Measurement>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// `{"unitCode": "wmoUnit:percent", "value": 20}`
#[derive(Debug, Deserialize)]
pub(crate) struct Measurement {
    #[serde(default)]
    pub value: Option<f64>,
}
