//! Zipcast - weather dashboard backend
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use zipcast_api::utils::logging::init_tracing;
use zipcast_api::{create_app, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = zipcast_infra::load_config().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let ctx = AppContext::new(config).context("failed to initialise application context")?;
    let ctx = Arc::new(ctx);

    let listener =
        TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "server_listening");

    axum::serve(listener, create_app(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server_stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown_requested");
}
