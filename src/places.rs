//! Nearby venue search via the Google Places API (New).

use std::future::Future;

use anyhow::{Context, Result};
use geo_types::Point;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::PlaceType;

const PROVIDER: &str = "places";

/// Provider cap on nearby-search radius, in meters.
pub const MAX_RADIUS_M: f64 = 50_000.0;

/// Provider cap on result count per nearby search.
pub const MAX_RESULTS: usize = 20;

/// Fields requested from the provider; everything else is never fetched.
const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.rating,\
    places.location,places.id,places.types,places.priceLevel,places.editorialSummary";

/// Searches the places directory around a center point.
pub trait PlacesProvider: Send + Sync {
    fn search_nearby(
        &self,
        origin: Point<f64>,
        radius_m: f64,
        place_type: PlaceType,
        keyword: Option<&str>,
    ) -> impl Future<Output = Result<Vec<RawPlace>, ApiError>> + Send;
}

/// Google Places (New) nearby-search client.
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Localized text wrapper used by displayName and editorialSummary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// A venue record as returned by the provider, before assembly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlace {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<LatLng>,
    pub types: Vec<String>,
    pub price_level: Option<String>,
    pub editorial_summary: Option<LocalizedText>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchNearbyResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
}

impl GooglePlacesClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid places base URL '{}'", config.base_url))?;
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

impl PlacesProvider for GooglePlacesClient {
    async fn search_nearby(
        &self,
        origin: Point<f64>,
        radius_m: f64,
        place_type: PlaceType,
        keyword: Option<&str>,
    ) -> Result<Vec<RawPlace>, ApiError> {
        let url = format!("{}/v1/places:searchNearby", self.base_url);

        debug!(radius_m, ?place_type, "searching nearby places");
        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&search_body(origin, radius_m, place_type))
            .send()
            .await
            .map_err(|e| ApiError::from_transport(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::rejected(PROVIDER, status, &body));
        }

        let body: SearchNearbyResponse = response
            .json()
            .await
            .map_err(|e| ApiError::from_transport(PROVIDER, e))?;

        let mut places = body.places;
        if let Some(keyword) = keyword {
            places = filter_by_keyword(places, keyword);
        }
        places.truncate(MAX_RESULTS);
        Ok(places)
    }
}

/// Build the nearby-search request body. The radius is clamped to the
/// provider maximum; results are ranked by distance from the center.
fn search_body(origin: Point<f64>, radius_m: f64, place_type: PlaceType) -> Value {
    json!({
        "includedTypes": place_type.included_types(),
        "maxResultCount": MAX_RESULTS,
        "locationRestriction": {
            "circle": {
                "center": {
                    "latitude": origin.y(),
                    "longitude": origin.x(),
                },
                "radius": radius_m.min(MAX_RADIUS_M),
            }
        },
        "rankPreference": "DISTANCE",
    })
}

/// The provider has no keyword parameter, so the keyword is applied as a
/// case-insensitive substring filter on the venue display name.
fn filter_by_keyword(places: Vec<RawPlace>, keyword: &str) -> Vec<RawPlace> {
    let keyword = keyword.to_lowercase();
    places
        .into_iter()
        .filter(|place| {
            place
                .display_name
                .as_ref()
                .and_then(|name| name.text.as_deref())
                .map(|text| text.to_lowercase().contains(&keyword))
                .unwrap_or(false)
        })
        .collect()
}
