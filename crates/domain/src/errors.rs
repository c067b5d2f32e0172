//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for zipcast.
///
/// `Clone` is required because a single upstream failure is handed to every
/// caller waiting on the same in-flight fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ZipcastError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String, upstream_status: Option<u16> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ZipcastError {
    /// Upstream failure without an HTTP status (network error, timeout,
    /// malformed body).
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable { message: message.into(), upstream_status: None }
    }

    /// Upstream failure that carries the HTTP status the upstream returned.
    pub fn upstream_status(message: impl Into<String>, status: u16) -> Self {
        Self::UpstreamUnavailable { message: message.into(), upstream_status: Some(status) }
    }

    /// Whether a retry later could plausibly succeed.
    ///
    /// Only transient failures allow a stale cache entry to be served in
    /// place of an error.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    /// HTTP status reported by the upstream, if any.
    pub const fn upstream_status_code(&self) -> Option<u16> {
        match self {
            Self::UpstreamUnavailable { upstream_status, .. } => *upstream_status,
            _ => None,
        }
    }
}

/// Result type alias for zipcast operations
pub type Result<T> = std::result::Result<T, ZipcastError>;
