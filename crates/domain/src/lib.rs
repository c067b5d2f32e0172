//! # Zipcast Domain
//!
//! Business domain types for the zipcast weather backend.
//!
//! This crate contains:
//! - Cache identity types (`CacheKind`, `CacheKey`, `CacheEntry`)
//! - Validated lookup inputs (`ZipCode`, `Coordinates`)
//! - Upstream payload shapes (geocode results, hourly forecasts)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other zipcast crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
