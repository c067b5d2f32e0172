/// ZipCodeStack geocoding client
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};
use zipcast_core::GeocodeProvider;
use zipcast_domain::{GeocodeResult, Result, UpstreamConfig, ZipCode, ZipcastError};

use super::types::{SearchResponse, ZipMatch};
use crate::http::HttpClient;

const INCOMPLETE_PAYLOAD: &str = "Incomplete upstream geocode payload";

/// Geocode provider backed by the ZipCodeStack search API.
pub struct ZipCodeStackClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl ZipCodeStackClient {
    /// Create a client against `base_url` (no trailing slash needed).
    pub fn new(http_client: HttpClient, base_url: impl Into<String>, api_key: String) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http_client, base_url, api_key }
    }

    /// Build the client and its HTTP stack from upstream settings.
    ///
    /// A missing API key is not an error here; lookups fail with
    /// `ZipcastError::Config` until one is provided.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.geocode_timeout_secs))
            .max_attempts(config.max_attempts as usize)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::new(
            http_client,
            config.zipcodestack_base_url.clone(),
            config.zipcodestack_api_key.clone(),
        ))
    }

    /// Resolve `zip` to coordinates and a place name.
    pub async fn geocode(&self, zip: &ZipCode) -> Result<GeocodeResult> {
        if self.api_key.trim().is_empty() {
            return Err(ZipcastError::Config("ZIPCODESTACK_API_KEY is not configured".into()));
        }

        let url = format!("{}/v1/search", self.base_url);
        let request = self.http_client.request(Method::GET, &url).query(&[
            ("codes", zip.as_str()),
            ("country", "us"),
            ("apikey", self.api_key.as_str()),
        ]);

        let payload: SearchResponse = self.http_client.send_json(request).await?;
        let result = parse_search_response(zip, payload)?;

        info!(
            zip = %zip,
            city = %result.city,
            state = %result.state,
            "Resolved ZIP via ZipCodeStack"
        );
        Ok(result)
    }
}

#[async_trait]
impl GeocodeProvider for ZipCodeStackClient {
    async fn fetch_geocode(&self, zip: &ZipCode) -> Result<GeocodeResult> {
        self.geocode(zip).await
    }
}

/// Pick the first match for `zip` out of a search response.
fn parse_search_response(zip: &ZipCode, payload: SearchResponse) -> Result<GeocodeResult> {
    let first = payload
        .results
        .get(zip.as_str())
        .and_then(|matches| matches.as_array())
        .and_then(|matches| matches.first())
        .cloned()
        .ok_or_else(|| ZipcastError::NotFound(format!("no geocode results for ZIP {zip}")))?;

    let candidate: ZipMatch = serde_json::from_value(first).map_err(|err| {
        debug!(zip = %zip, error = %err, "Unreadable ZipCodeStack match");
        ZipcastError::upstream(INCOMPLETE_PAYLOAD)
    })?;

    let lat = candidate.latitude.as_ref().and_then(|v| v.as_f64());
    let lon = candidate.longitude.as_ref().and_then(|v| v.as_f64());
    let city = candidate.city.filter(|c| !c.trim().is_empty());
    let state = candidate
        .state_code
        .filter(|s| !s.trim().is_empty())
        .or(candidate.state.filter(|s| !s.trim().is_empty()));

    match (lat, lon, city, state) {
        (Some(lat), Some(lon), Some(city), Some(state)) => {
            Ok(GeocodeResult { zip: zip.as_str().to_string(), lat, lon, city, state })
        }
        _ => Err(ZipcastError::upstream(INCOMPLETE_PAYLOAD)),
    }
}
