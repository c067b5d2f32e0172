//! Validated lookup inputs.
//!
//! A `ZipCode` or `Coordinates` value can only exist once the raw request
//! input has passed validation, so everything downstream (cache keys,
//! upstream calls) works with known-good values.

use std::fmt;

use thiserror::Error;

use crate::constants::{COORDINATE_PRECISION, ZIP_CODE_LENGTH};
use crate::errors::ZipcastError;

/// Why a raw lookup input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ZIP must be exactly 5 digits.")]
    InvalidZip,
    #[error("Latitude must be between -90 and 90.")]
    InvalidLatitude,
    #[error("Longitude must be between -180 and 180.")]
    InvalidLongitude,
}

impl ValidationError {
    /// Stable machine-readable code returned to API clients.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidZip => "invalid_zip",
            Self::InvalidLatitude => "invalid_latitude",
            Self::InvalidLongitude => "invalid_longitude",
        }
    }
}

impl From<ValidationError> for ZipcastError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// A five-digit US ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);

impl ZipCode {
    /// Parses a ZIP code, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() == ZIP_CODE_LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidZip)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A latitude/longitude pair inside the valid WGS84 ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::InvalidLatitude);
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::InvalidLongitude);
        }
        Ok(Self { lat, lon })
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Coordinates rounded to the cache key precision.
    ///
    /// Rounding never leaves the valid range, so the result needs no
    /// re-validation.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self { lat: round_to_precision(self.lat), lon: round_to_precision(self.lon) }
    }

    /// `"{lat},{lon}"` at key precision, e.g. `"39.7555,-105.2211"`.
    pub fn key_string(&self) -> String {
        let normalized = self.normalized();
        format!(
            "{:.prec$},{:.prec$}",
            normalized.lat,
            normalized.lon,
            prec = COORDINATE_PRECISION
        )
    }
}

fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_PRECISION as i32);
    // Adding 0.0 folds -0.0 into 0.0 so both format identically.
    (value * scale).round() / scale + 0.0
}
