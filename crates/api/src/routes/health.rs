use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::utils::logging::error_label;
use crate::AppContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthResponse>) {
    match ctx.check_database().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ok", database: "ok" })),
        Err(err) => {
            warn!(error = error_label(&err), detail = %err, "database_health_check_failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "degraded", database: "unavailable" }),
            )
        }
    }
}
