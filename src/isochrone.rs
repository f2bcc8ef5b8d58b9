//! Travel-time polygon retrieval from OpenRouteService.

use std::future::Future;

use anyhow::{Context, Result};
use geo_types::{Geometry, Point, Polygon};
use geojson::FeatureCollection;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::TravelMode;

const PROVIDER: &str = "openrouteservice";

/// Computes the polygon reachable from an origin within a time budget.
pub trait IsochroneProvider: Send + Sync {
    fn isochrone(
        &self,
        origin: Point<f64>,
        mode: TravelMode,
        minutes: u32,
    ) -> impl Future<Output = Result<Polygon<f64>, ApiError>> + Send;
}

/// OpenRouteService isochrone client.
pub struct OrsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OrsClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid isochrone base URL '{}'", config.base_url))?;
        let client = Client::builder()
            .user_agent(concat!("timereach/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl IsochroneProvider for OrsClient {
    async fn isochrone(
        &self,
        origin: Point<f64>,
        mode: TravelMode,
        minutes: u32,
    ) -> Result<Polygon<f64>, ApiError> {
        let url = format!("{}/v2/isochrones/{}", self.base_url, mode.ors_profile());
        // Range is in seconds; locations are [lon, lat].
        let body = json!({
            "locations": [[origin.x(), origin.y()]],
            "range": [minutes * 60],
        });

        debug!(%mode, minutes, "requesting isochrone");
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::rejected(PROVIDER, status, &body));
        }

        let collection: FeatureCollection = response
            .json()
            .await
            .map_err(|e| ApiError::from_transport(PROVIDER, e))?;

        primary_polygon(collection)
    }
}

/// Extract the outer polygon of the first isochrone feature. Disjoint
/// secondary rings are dropped; only the primary ring drives the search.
fn primary_polygon(collection: FeatureCollection) -> Result<Polygon<f64>, ApiError> {
    let feature = collection.features.into_iter().next().ok_or_else(|| {
        ApiError::InvalidGeometry("isochrone response contains no features".to_string())
    })?;
    let geometry = feature.geometry.ok_or_else(|| {
        ApiError::InvalidGeometry("isochrone feature has no geometry".to_string())
    })?;

    let geometry = Geometry::<f64>::try_from(geometry)
        .map_err(|e| ApiError::InvalidGeometry(e.to_string()))?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon),
        Geometry::MultiPolygon(multi) => multi.0.into_iter().next().ok_or_else(|| {
            ApiError::InvalidGeometry("isochrone multipolygon is empty".to_string())
        }),
        _ => Err(ApiError::InvalidGeometry(
            "isochrone geometry is not a polygon".to_string(),
        )),
    }
}
