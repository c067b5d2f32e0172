/// ZipCodeStack integration for ZIP geocoding
///
/// `GET /v1/search?codes={zip}&country=us&apikey={key}` returns matches
/// keyed by ZIP; the first match supplies the coordinates, city and state.
pub mod client;
pub mod types;

pub use client::ZipCodeStackClient;
