//! Domain data types

mod cache;
mod forecast;
mod geocode;
mod location;

pub use cache::{CacheEntry, CacheKey, CacheKind, CachePayload, CacheSource, Cached, Freshness};
pub use forecast::{HourlyForecast, HourlyPeriod, Location};
pub use geocode::GeocodeResult;
pub use location::{Coordinates, ValidationError, ZipCode};
