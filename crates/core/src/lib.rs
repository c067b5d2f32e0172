//! # Zipcast Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The cache freshness policy, singleflight coordinator and orchestrator
//! - Port/adapter interfaces (traits) for the store and upstream providers
//! - The weather service façade used by route handlers
//!
//! ## Architecture Principles
//! - Only depends on `zipcast-common` and `zipcast-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod cache;
pub mod weather;

pub use cache::freshness::classify;
pub use cache::ports::CacheStore;
pub use cache::service::{CacheLookup, CacheOrchestrator, CachePolicy};
pub use cache::singleflight::FlightCoordinator;
pub use weather::ports::{ForecastProvider, GeocodeProvider};
pub use weather::service::WeatherService;
