use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use zipcast_domain::{CacheSource, GeocodeResult, ZipCode};

use super::error::{ApiError, Lookup};
use crate::AppContext;

/// `{zip, lat, lon, city, state, source}`
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    #[serde(flatten)]
    pub result: GeocodeResult,
    pub source: CacheSource,
}

pub async fn geocode_zip(
    State(ctx): State<Arc<AppContext>>,
    Path(zip): Path<String>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let zip_code = ZipCode::parse(&zip).map_err(|err| ApiError::validation(err, zip.as_str()))?;

    let cached = ctx
        .weather
        .geocode_zip(&zip_code, ctx.serve_stale_on_error())
        .await
        .map_err(|err| ApiError::from_lookup(Lookup::Geocode, &err))?;

    Ok(Json(GeocodeResponse { result: cached.value, source: cached.source }))
}
