//! # Zipcast Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite-backed durable cache store and its connection manager
//! - An HTTP client with retry/backoff
//! - Upstream integrations (weather.gov, ZipCodeStack)
//! - Configuration loading (files + environment)
//!
//! ## Architecture
//! - Implements traits defined in `zipcast-core`
//! - Depends on `zipcast-common`, `zipcast-domain` and `zipcast-core`
//! - Contains all "impure" code (disk and network I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use config::load as load_config;
pub use database::{DbManager, SqliteCacheStore};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::{WeatherGovClient, ZipCodeStackClient};
