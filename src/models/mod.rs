//! Core data models for the search pipeline.

pub mod place;
pub mod query;

pub use place::{Location, Place, SearchResponse};
pub use query::{OriginSpec, PlaceType, RawQuery, SearchRequest, TravelMode};
