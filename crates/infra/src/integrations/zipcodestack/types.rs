//! ZipCodeStack response shapes.

use serde::Deserialize;
use serde_json::Value;

/// `results` is an object keyed by ZIP, or an empty array when nothing
/// matched, so it stays untyped until inspected.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ZipMatch {
    #[serde(default)]
    pub latitude: Option<NumberOrString>,
    #[serde(default)]
    pub longitude: Option<NumberOrString>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Coordinates arrive as either JSON numbers or numeric strings. Only
/// finite values count; `"NaN"` and `"inf"` parse but are not coordinates.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}
