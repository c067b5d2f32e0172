use serde::{Deserialize, Serialize};

/// A ZIP code resolved to a point and its place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub state: String,
}
