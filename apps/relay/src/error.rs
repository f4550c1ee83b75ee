//! # Relay Errors
//!
//! Every handler returns `RelayResult<Response>`; the error half knows its
//! own status code and body.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MissingUrl          400  Missing URL parameter                         │
//! │  InvalidUrl          400  Invalid URL parameter                         │
//! │  InvalidIdentifier   400  Invalid image identifier                      │
//! │  UpstreamStatus(n)   n    Failed to fetch image. Status: n              │
//! │  Fetch               500  Internal Server Error                         │
//! │  ImageUnavailable    502  {"error": "Error fetching image"}             │
//! │  Gateway             502  Bad Gateway                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for relay handlers.
pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing URL parameter")]
    MissingUrl,

    #[error("Invalid URL parameter: {0}")]
    InvalidUrl(String),

    #[error("Invalid image identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Failed to fetch image. Status: {0}")]
    UpstreamStatus(u16),

    /// Transport failure while proxying an arbitrary image URL.
    #[error("Image fetch failed: {0}")]
    Fetch(String),

    /// Neither the requested image nor the placeholder could be served.
    #[error("Error fetching image")]
    ImageUnavailable,

    /// The inventory API couldn't be reached.
    #[error("Inventory API unreachable: {0}")]
    Gateway(String),

    /// The upstream HTTP client couldn't be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::MissingUrl => {
                (StatusCode::BAD_REQUEST, "Missing URL parameter").into_response()
            }
            RelayError::InvalidUrl(_) => {
                (StatusCode::BAD_REQUEST, "Invalid URL parameter").into_response()
            }
            RelayError::InvalidIdentifier(_) => {
                (StatusCode::BAD_REQUEST, "Invalid image identifier").into_response()
            }
            RelayError::UpstreamStatus(code) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, self.to_string()).into_response()
            }
            RelayError::Fetch(_) | RelayError::ClientBuild(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            RelayError::ImageUnavailable => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Error fetching image" })),
            )
                .into_response(),
            RelayError::Gateway(_) => (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response(),
        }
    }
}
