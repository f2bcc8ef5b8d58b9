//! TimeReach - find points of interest within a travel-time budget.
//!
//! This library provides the shared modules for the server binary: the
//! provider adapters (geocoding, isochrones, places), the radius estimator,
//! and the per-request pipeline that chains them.

pub mod config;
pub mod error;
pub mod geocode;
pub mod isochrone;
pub mod models;
pub mod pipeline;
pub mod places;
pub mod radius;

pub use error::ApiError;
pub use models::{Place, SearchRequest, SearchResponse};
