/// weather.gov integration for hourly forecasts
///
/// Two-step lookup against the National Weather Service API:
///
/// 1. `GET /points/{lat},{lon}` resolves a point to its forecast grid and
///    returns the grid's `forecastHourly` URL
/// 2. `GET {forecastHourly}` returns the hourly periods
///
/// Periods are flattened into [`HourlyPeriod`](zipcast_domain::HourlyPeriod):
/// wind speed strings become integer mph and measurement objects become
/// their `value`.
///
/// # Error Handling
///
/// - **404 on points**: the location has no forecast grid (`NotFound`)
/// - **400 on points**: weather.gov rejected the coordinates (`InvalidInput`)
/// - **5xx / network**: retried by `HttpClient`, then `UpstreamUnavailable`
pub mod client;
pub mod types;

pub use client::{parse_wind_speed_mph, WeatherGovClient};
