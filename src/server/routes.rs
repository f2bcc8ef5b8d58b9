//! HTTP handlers for the search endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde_json::{json, Value};
use tracing::error;

use timereach::error::ApiError;
use timereach::geocode::NominatimGeocoder;
use timereach::isochrone::OrsClient;
use timereach::models::{RawQuery, SearchResponse};
use timereach::pipeline::find_reachable_places;
use timereach::places::GooglePlacesClient;

/// Application state shared across handlers
pub struct AppState {
    pub geocoder: NominatimGeocoder,
    pub isochrones: OrsClient,
    pub places: GooglePlacesClient,
}

/// Root endpoint providing API information
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": "TimeReach API",
        "description": "Find places within travel time using isochrones",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint. The service is stateless; if we can answer, we
/// are up.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Find places reachable within the requested travel time.
pub async fn places_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    // Validation happens before any upstream call.
    let request = params.validate()?;

    let response = find_reachable_places(
        &state.geocoder,
        &state.isochrones,
        &state.places,
        request,
    )
    .await
    .map_err(|e| {
        error!("Search execution failed: {}", e);
        e
    })?;

    Ok(Json(response))
}
