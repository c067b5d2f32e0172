//! External service integrations

pub mod weather_gov;
pub mod zipcodestack;

pub use weather_gov::WeatherGovClient;
pub use zipcodestack::ZipCodeStackClient;
