//! Query parameter parsing and validation.

use std::fmt;
use std::str::FromStr;

use geo_types::Point;
use serde::Deserialize;

use crate::error::ApiError;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 60;
pub const DEFAULT_MINUTES: u32 = 20;

const MIN_KEYWORD_LEN: usize = 2;
const MAX_KEYWORD_LEN: usize = 50;

/// Transport mode for the isochrone computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    /// The OpenRouteService routing profile for this mode.
    pub fn ors_profile(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving-car",
            TravelMode::Walking => "foot-walking",
            TravelMode::Cycling => "cycling-regular",
        }
    }
}

impl FromStr for TravelMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driving" | "driving-car" => Ok(TravelMode::Driving),
            "walking" | "foot-walking" => Ok(TravelMode::Walking),
            "cycling" | "cycling-regular" => Ok(TravelMode::Cycling),
            other => Err(ApiError::InvalidParameter(format!(
                "unsupported transport mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ors_profile())
    }
}

/// Venue category filter passed through to the places provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceType {
    #[default]
    Restaurant,
    Cafe,
    Bar,
    FastFood,
    Bakery,
    /// No type restriction.
    Any,
}

impl PlaceType {
    /// Provider type identifiers for the `includedTypes` filter.
    /// Empty means unrestricted.
    pub fn included_types(&self) -> &'static [&'static str] {
        match self {
            PlaceType::Restaurant => &["restaurant"],
            PlaceType::Cafe => &["cafe"],
            PlaceType::Bar => &["bar"],
            PlaceType::FastFood => &["fast_food_restaurant"],
            PlaceType::Bakery => &["bakery"],
            PlaceType::Any => &[],
        }
    }
}

impl FromStr for PlaceType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(PlaceType::Restaurant),
            "cafe" => Ok(PlaceType::Cafe),
            "bar" => Ok(PlaceType::Bar),
            "fast_food_restaurant" => Ok(PlaceType::FastFood),
            "bakery" => Ok(PlaceType::Bakery),
            "any" => Ok(PlaceType::Any),
            other => Err(ApiError::InvalidParameter(format!(
                "unsupported place type '{other}'"
            ))),
        }
    }
}

/// Raw `/places` query parameters as they arrive on the wire.
///
/// Numeric fields are kept as strings and parsed during validation, so a
/// malformed value surfaces as `InvalidParameter` with the JSON error body
/// instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RawQuery {
    /// Free-text location name, geocoded when no coordinates are given.
    pub location: Option<String>,
    /// Starting point latitude.
    pub lat: Option<String>,
    /// Starting point longitude.
    pub lon: Option<String>,
    /// Travel time budget in minutes (1-60).
    pub minutes: Option<String>,
    /// Venue category filter.
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    /// Transport mode (defaults to driving).
    pub mode: Option<String>,
    /// Keyword filter on venue names.
    pub keyword: Option<String>,
}

/// Where the search starts: explicit coordinates or a name to geocode.
#[derive(Debug, Clone, PartialEq)]
pub enum OriginSpec {
    /// lon/lat point supplied directly by the caller.
    Coordinates(Point<f64>),
    /// Free-text name to resolve via the geocoder.
    Name(String),
}

/// A fully validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: OriginSpec,
    pub minutes: u32,
    pub mode: TravelMode,
    pub place_type: PlaceType,
    pub keyword: Option<String>,
}

impl RawQuery {
    /// Validate the raw parameters. Pure: no upstream call happens before
    /// this succeeds.
    pub fn validate(self) -> Result<SearchRequest, ApiError> {
        let minutes = match self.minutes.as_deref() {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ApiError::InvalidParameter(format!("minutes must be an integer, got '{raw}'"))
            })?,
            None => DEFAULT_MINUTES,
        };
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            return Err(ApiError::InvalidParameter(format!(
                "minutes must be between {MIN_MINUTES} and {MAX_MINUTES}, got {minutes}"
            )));
        }

        let lat = match self.lat.as_deref() {
            Some(raw) => Some(parse_coordinate("latitude", raw)?),
            None => None,
        };
        let lon = match self.lon.as_deref() {
            Some(raw) => Some(parse_coordinate("longitude", raw)?),
            None => None,
        };

        if let Some(lat) = lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ApiError::InvalidParameter(format!(
                    "latitude must be between -90 and 90, got {lat}"
                )));
            }
        }
        if let Some(lon) = lon {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::InvalidParameter(format!(
                    "longitude must be between -180 and 180, got {lon}"
                )));
            }
        }

        // Coordinates win over a location name when both are supplied.
        let origin = match (lat, lon, self.location) {
            (Some(lat), Some(lon), _) => OriginSpec::Coordinates(Point::new(lon, lat)),
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(ApiError::InvalidParameter(
                    "both lat and lon are required when searching by coordinates".to_string(),
                ));
            }
            (None, None, Some(name)) if !name.trim().is_empty() => {
                OriginSpec::Name(name.trim().to_string())
            }
            _ => {
                return Err(ApiError::InvalidParameter(
                    "either location or a lat/lon pair must be supplied".to_string(),
                ));
            }
        };

        let mode = match self.mode.as_deref() {
            Some(s) => s.parse()?,
            None => TravelMode::default(),
        };
        let place_type = match self.place_type.as_deref() {
            Some(s) => s.parse()?,
            None => PlaceType::default(),
        };

        let keyword = match self.keyword {
            Some(k) => {
                let k = k.trim().to_string();
                if k.len() < MIN_KEYWORD_LEN || k.len() > MAX_KEYWORD_LEN {
                    return Err(ApiError::InvalidParameter(format!(
                        "keyword must be {MIN_KEYWORD_LEN}-{MAX_KEYWORD_LEN} characters"
                    )));
                }
                Some(k)
            }
            None => None,
        };

        Ok(SearchRequest {
            origin,
            minutes,
            mode,
            place_type,
            keyword,
        })
    }
}

fn parse_coordinate(name: &'static str, raw: &str) -> Result<f64, ApiError> {
    raw.trim().parse().map_err(|_| {
        ApiError::InvalidParameter(format!("{name} must be a number, got '{raw}'"))
    })
}
