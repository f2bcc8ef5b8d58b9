//! Free-text location resolution via Nominatim.

use std::future::Future;

use anyhow::{Context, Result};
use geo_types::Point;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::GeocoderConfig;
use crate::error::ApiError;

const PROVIDER: &str = "nominatim";

/// Resolves a free-text place name to a lon/lat point.
pub trait Geocoder: Send + Sync {
    fn resolve(&self, query: &str) -> impl Future<Output = Result<Point<f64>, ApiError>> + Send;
}

/// Nominatim-backed geocoder. One attempt per request, no retries.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

/// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid geocoder base URL '{}'", config.base_url))?;
        let client = Client::builder()
            .user_agent(concat!("timereach/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<Point<f64>, ApiError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ApiError::from_transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::rejected(PROVIDER, status, ""));
        }

        let hits: Vec<NominatimHit> = response
            .json()
            .await
            .map_err(|e| ApiError::from_transport(PROVIDER, e))?;

        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::LocationNotFound(query.to_string()))?;

        let parse = |s: &str| -> Result<f64, ApiError> {
            s.parse().map_err(|_| ApiError::UpstreamRejected {
                provider: PROVIDER,
                message: format!("non-numeric coordinate '{s}' in response"),
            })
        };
        let lat = parse(&hit.lat)?;
        let lon = parse(&hit.lon)?;
        debug!(query, lat, lon, "geocoded location");

        Ok(Point::new(lon, lat))
    }
}
