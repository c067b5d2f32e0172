use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use zipcast_domain::{LoggingConfig, ZipcastError};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies. Output
/// is human-readable unless `logging.json` is enabled.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    Ok(())
}

/// Log method, path, status and latency for every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let duration_ms = started.elapsed().as_millis() as u64;
    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms,
        "http_request_completed"
    );
    response
}

/// Convert a `ZipcastError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ZipcastError) -> &'static str {
    match error {
        ZipcastError::InvalidInput(_) => "invalid_input",
        ZipcastError::UpstreamUnavailable { .. } => "upstream_unavailable",
        ZipcastError::NotFound(_) => "not_found",
        ZipcastError::StoreUnavailable(_) => "store_unavailable",
        ZipcastError::Config(_) => "config",
        ZipcastError::Internal(_) => "internal",
    }
}
