//! Public response shape and assembly from raw provider records.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::places::RawPlace;

/// Geographic coordinates as exposed in the response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// A venue in the public response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Average rating out of 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub location: Location,
    /// Provider identifier for the venue.
    pub place_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub types: Vec<String>,
    /// Provider price bucket, e.g. "PRICE_LEVEL_MODERATE".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,
    /// Editorial description where the provider has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Place {
    /// Assemble a venue from a raw provider record.
    ///
    /// Records missing a name, identifier, or coordinates are skipped with
    /// a warning so one bad record cannot abort the whole response. Missing
    /// optional fields (rating, price level, description) are simply
    /// omitted.
    pub fn from_raw(raw: RawPlace) -> Option<Self> {
        let id_for_log = raw.id.clone();
        let name = raw.display_name.and_then(|n| n.text);
        match (name, raw.id, raw.location) {
            (Some(name), Some(place_id), Some(location)) => Some(Self {
                name,
                address: raw.formatted_address,
                rating: raw.rating,
                location: Location {
                    lat: location.latitude,
                    lng: location.longitude,
                },
                place_id,
                types: raw.types,
                price_level: raw.price_level,
                description: raw.editorial_summary.and_then(|s| s.text),
            }),
            _ => {
                warn!(id = ?id_for_log, "skipping malformed venue record");
                None
            }
        }
    }
}

/// Final response for a search request. Built fresh per request.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Estimated reachable radius in meters.
    pub average_radius: u32,
    pub places: Vec<Place>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{LatLng, LocalizedText, RawPlace};

    fn full_record() -> RawPlace {
        RawPlace {
            id: Some("ChIJ123".to_string()),
            display_name: Some(LocalizedText {
                text: Some("Le Bistrot Parisien".to_string()),
            }),
            formatted_address: Some("12 Avenue des Champs-Élysées, Paris".to_string()),
            rating: Some(4.5),
            location: Some(LatLng {
                latitude: 48.8584,
                longitude: 2.2945,
            }),
            types: vec!["restaurant".to_string(), "french_restaurant".to_string()],
            price_level: Some("PRICE_LEVEL_MODERATE".to_string()),
            editorial_summary: Some(LocalizedText {
                text: Some("Traditional French bistro".to_string()),
            }),
        }
    }

    #[test]
    fn assembles_full_record() {
        let place = Place::from_raw(full_record()).unwrap();
        assert_eq!(place.name, "Le Bistrot Parisien");
        assert_eq!(place.place_id, "ChIJ123");
        assert_eq!(place.location.lat, 48.8584);
        assert_eq!(place.rating, Some(4.5));
        assert_eq!(place.types.len(), 2);
        assert_eq!(place.description.as_deref(), Some("Traditional French bistro"));
    }

    #[test]
    fn skips_record_without_name() {
        let raw = RawPlace {
            display_name: None,
            ..full_record()
        };
        assert!(Place::from_raw(raw).is_none());
    }

    #[test]
    fn skips_record_without_coordinates() {
        let raw = RawPlace {
            location: None,
            ..full_record()
        };
        assert!(Place::from_raw(raw).is_none());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let raw = RawPlace {
            rating: None,
            price_level: None,
            editorial_summary: None,
            formatted_address: None,
            ..full_record()
        };
        let place = Place::from_raw(raw).unwrap();
        assert!(place.rating.is_none());
        assert!(place.price_level.is_none());
        assert!(place.description.is_none());
        assert!(place.address.is_none());
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let raw = RawPlace {
            rating: None,
            price_level: None,
            editorial_summary: None,
            ..full_record()
        };
        let json = serde_json::to_value(Place::from_raw(raw).unwrap()).unwrap();
        assert!(json.get("rating").is_none());
        assert!(json.get("price_level").is_none());
        assert!(json.get("description").is_none());
        assert_eq!(json["place_id"], "ChIJ123");
    }
}
