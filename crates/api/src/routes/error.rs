//! Error responses for the HTTP API.
//!
//! Every failure is rendered as `{"detail": {"error": <code>, "message": <text>, ...}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{error, warn};
use zipcast_domain::{ValidationError, ZipcastError};

use crate::utils::logging::error_label;

/// Which lookup a service error came from. Picks the client-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Geocode,
    HourlyForecast,
}

impl Lookup {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Geocode => "geocode",
            Self::HourlyForecast => "hourly_forecast",
        }
    }

    const fn unavailable_message(self) -> &'static str {
        match self {
            Self::Geocode => "Unable to resolve ZIP right now.",
            Self::HourlyForecast => "Unable to load hourly forecast right now.",
        }
    }

    const fn not_found_message(self) -> &'static str {
        match self {
            Self::Geocode => "No location found for this ZIP.",
            Self::HourlyForecast => "No forecast available for this location.",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: Map<String, Value>,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        let mut detail = Map::new();
        detail.insert("error".into(), Value::from(code));
        detail.insert("message".into(), Value::from(message.into()));
        Self { status, detail }
    }

    fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.detail.insert(field.into(), value.into());
        self
    }

    /// 422 for a rejected request input, echoing the offending value.
    pub fn validation(err: ValidationError, value: impl Into<Value>) -> Self {
        let field = match err {
            ValidationError::InvalidZip => "zip",
            ValidationError::InvalidLatitude => "lat",
            ValidationError::InvalidLongitude => "lon",
        };
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.code(), err.to_string()).with(field, value)
    }

    /// Map a service failure to its HTTP response.
    pub fn from_lookup(lookup: Lookup, err: &ZipcastError) -> Self {
        let label = error_label(err);
        match err {
            ZipcastError::UpstreamUnavailable { upstream_status, .. } => {
                warn!(lookup = lookup.as_str(), error = label, detail = %err, "lookup_failed");
                Self::new(StatusCode::BAD_GATEWAY, "upstream_error", lookup.unavailable_message())
                    .with("upstream_status", *upstream_status)
            }
            ZipcastError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "not_found", lookup.not_found_message())
            }
            ZipcastError::InvalidInput(message) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", message.clone())
            }
            ZipcastError::Config(_) => {
                warn!(lookup = lookup.as_str(), error = label, detail = %err, "lookup_failed");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "not_configured",
                    "Upstream provider is not configured.",
                )
            }
            ZipcastError::StoreUnavailable(_) | ZipcastError::Internal(_) => {
                error!(lookup = lookup.as_str(), error = label, detail = %err, "lookup_failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error.",
                )
            }
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn detail(&self) -> &Map<String, Value> {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = Json(json!({ "detail": self.detail })).into_response();
        *response.status_mut() = self.status;
        response
    }
}
