//! # Zipcast API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - axum routes (request validation and response shaping)
//! - Application context (dependency injection)
//! - Tracing setup and the `zipcast` binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Route handlers only talk to the `WeatherService` façade

pub mod context;
pub mod routes;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use routes::create_app;
