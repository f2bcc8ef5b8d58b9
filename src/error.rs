//! Error taxonomy and HTTP mapping.
//!
//! Each adapter returns its own specific error kind; the endpoint layer
//! serializes them into a status code plus a structured JSON body. There is
//! no fallback to partial or stale data.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// How much of a provider error body is passed through to clients.
const MAX_PROVIDER_MESSAGE_LEN: usize = 200;

/// Everything that can fail while answering a search request.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Client input violates a constraint (bad range, missing origin, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Geocoding produced no match for the requested location.
    #[error("no match found for location '{0}'")]
    LocationNotFound(String),

    /// The isochrone provider returned unusable geometry.
    #[error("degenerate isochrone geometry: {0}")]
    InvalidGeometry(String),

    /// Network failure or timeout talking to a provider.
    #[error("{provider} is unavailable: {reason}")]
    UpstreamUnavailable {
        provider: &'static str,
        reason: String,
    },

    /// The provider returned a defined error (invalid request, quota, ...).
    #[error("{provider} rejected the request: {message}")]
    UpstreamRejected {
        provider: &'static str,
        message: String,
    },
}

impl ApiError {
    /// Stable machine-readable kind for the error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidParameter(_) => "invalid_parameter",
            ApiError::LocationNotFound(_) => "location_not_found",
            ApiError::InvalidGeometry(_) => "invalid_geometry",
            ApiError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ApiError::UpstreamRejected { .. } => "upstream_rejected",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            // Degenerate geometry is an upstream contract violation.
            ApiError::InvalidGeometry(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamUnavailable { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Build an `UpstreamRejected` from a provider's HTTP error response.
    /// The body is passed through where safe: status line plus a truncated
    /// excerpt.
    pub fn rejected(provider: &'static str, status: reqwest::StatusCode, body: &str) -> Self {
        let excerpt: String = body.chars().take(MAX_PROVIDER_MESSAGE_LEN).collect();
        let message = if excerpt.is_empty() {
            format!("status {status}")
        } else {
            format!("status {status}: {excerpt}")
        };
        ApiError::UpstreamRejected { provider, message }
    }

    /// Map a transport-level failure from the HTTP client.
    ///
    /// Timeouts and connection errors mean the provider is unavailable; a
    /// response body we cannot decode means the provider broke its contract.
    pub fn from_transport(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::UpstreamRejected {
                provider,
                message: format!("unparseable response: {err}"),
            }
        } else if err.is_timeout() {
            ApiError::UpstreamUnavailable {
                provider,
                reason: "request timed out".to_string(),
            }
        } else {
            ApiError::UpstreamUnavailable {
                provider,
                reason: err.to_string(),
            }
        }
    }
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(
            ApiError::InvalidParameter("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::LocationNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidGeometry("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::UpstreamUnavailable {
                provider: "openrouteservice",
                reason: "x".into()
            }
            .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::UpstreamRejected {
                provider: "places",
                message: "x".into()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn rejected_message_is_truncated() {
        let long = "x".repeat(500);
        let error = ApiError::rejected("openrouteservice", reqwest::StatusCode::FORBIDDEN, &long);
        let ApiError::UpstreamRejected { message, .. } = &error else {
            panic!("expected UpstreamRejected");
        };
        assert!(message.starts_with("status 403"));
        assert!(message.len() <= "status 403 Forbidden: ".len() + MAX_PROVIDER_MESSAGE_LEN);
    }

    #[test]
    fn rejected_without_body_keeps_the_status_line() {
        let error = ApiError::rejected("places", reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        let ApiError::UpstreamRejected { message, .. } = &error else {
            panic!("expected UpstreamRejected");
        };
        assert_eq!(message, "status 429 Too Many Requests");
    }

    #[tokio::test]
    async fn error_responses_carry_the_json_body() {
        // A malformed minutes value must produce the structured body, not a
        // bare-text rejection.
        let raw = crate::models::RawQuery {
            lat: Some("48.8584".to_string()),
            lon: Some("2.2945".to_string()),
            minutes: Some("abc".to_string()),
            ..Default::default()
        };
        let error = raw.validate().unwrap_err();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid_parameter");
        assert!(body["message"].as_str().unwrap().contains("minutes"));
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(ApiError::InvalidParameter("x".into()).kind(), "invalid_parameter");
        assert_eq!(
            ApiError::UpstreamUnavailable {
                provider: "nominatim",
                reason: "x".into()
            }
            .kind(),
            "upstream_unavailable"
        );
    }
}
