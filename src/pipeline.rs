//! Per-request orchestration.
//!
//! Strictly sequential: resolve the origin, fetch the isochrone, reduce it
//! to a radius, query the places directory, assemble the response. Each step
//! depends on the previous one, so there is no fan-out, and nothing outlives
//! the request.

use geo_types::Point;
use tracing::debug;

use crate::error::ApiError;
use crate::geocode::Geocoder;
use crate::isochrone::IsochroneProvider;
use crate::models::{OriginSpec, Place, SearchRequest, SearchResponse};
use crate::places::PlacesProvider;
use crate::radius::average_radius;

/// Answer a validated search request against the three providers.
///
/// No partial results: a failing geocode, isochrone, or places call fails
/// the whole request. Individual malformed venue records are the one
/// exception; they are dropped during assembly.
pub async fn find_reachable_places<G, I, P>(
    geocoder: &G,
    isochrones: &I,
    places: &P,
    request: SearchRequest,
) -> Result<SearchResponse, ApiError>
where
    G: Geocoder,
    I: IsochroneProvider,
    P: PlacesProvider,
{
    let origin: Point<f64> = match &request.origin {
        OriginSpec::Coordinates(point) => *point,
        OriginSpec::Name(name) => geocoder.resolve(name).await?,
    };

    let isochrone = isochrones
        .isochrone(origin, request.mode, request.minutes)
        .await?;

    let radius_m = average_radius(origin, &isochrone)?;
    debug!(radius_m, "estimated search radius");

    let raw = places
        .search_nearby(origin, radius_m, request.place_type, request.keyword.as_deref())
        .await?;

    let assembled: Vec<Place> = raw.into_iter().filter_map(Place::from_raw).collect();

    Ok(SearchResponse {
        average_radius: radius_m as u32,
        places: assembled,
    })
}
