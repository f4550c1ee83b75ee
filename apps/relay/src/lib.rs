//! # pricecheck-relay
//!
//! HTTP relay between the kiosk page and the upstream hosts.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /health                 → "OK"                                    │
//! │  GET  /api/image-proxy?url=   → any absolute image URL                  │
//! │  GET  /api/images/{*id}       → {images.base_url}/{id}, else placeholder│
//! │  ANY  /api/{*path}            → {inventory.base_url}/{path}             │
//! │                                                                         │
//! │  Image routes carry permissive CORS headers.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tracing::warn;
use url::Url;

use pricecheck_lookup::KioskConfig;

pub use error::{RelayError, RelayResult};

/// Shared state for the relay handlers.
#[derive(Debug)]
pub struct RelayState {
    /// Client for the image host and proxied image URLs.
    pub image_http: reqwest::Client,
    /// Client for the inventory API pass-through.
    pub api_http: reqwest::Client,
    /// Image host root, always ending in `/`.
    pub image_base: Url,
    /// Inventory API root, always ending in `/`.
    pub inventory_base: Url,
    /// Identifier served when an image can't be fetched.
    pub placeholder: String,
}

impl RelayState {
    /// Builds the state (and both HTTP clients) from the kiosk config.
    pub fn from_config(config: &KioskConfig) -> RelayResult<Self> {
        let timeout = config.inventory.timeout();

        if config.images.accept_invalid_certs {
            warn!("Image client accepts invalid TLS certificates");
        }
        let image_http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.images.accept_invalid_certs)
            .build()
            .map_err(|e| RelayError::ClientBuild(e.to_string()))?;

        if config.inventory.accept_invalid_certs {
            warn!("Inventory client accepts invalid TLS certificates");
        }
        let api_http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.inventory.accept_invalid_certs)
            .build()
            .map_err(|e| RelayError::ClientBuild(e.to_string()))?;

        Ok(RelayState {
            image_http,
            api_http,
            image_base: directory_url(&config.images.base_url)?,
            inventory_base: directory_url(&config.inventory.base_url)?,
            placeholder: config.images.placeholder.clone(),
        })
    }
}

/// Parses `raw` as a base that relative paths are appended to.
fn directory_url(raw: &str) -> RelayResult<Url> {
    Url::parse(&format!("{}/", raw.trim_end_matches('/')))
        .map_err(|e| RelayError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Builds the relay router.
pub fn build_router(state: Arc<RelayState>) -> Router {
    let images = Router::new()
        .route("/api/image-proxy", get(routes::image_proxy))
        .route("/api/images", get(routes::placeholder_image))
        .route("/api/images/", get(routes::placeholder_image))
        .route("/api/images/{*id}", get(routes::image_by_id))
        .layer(middleware::map_response(routes::cors_headers));

    Router::new()
        .route("/health", get(routes::health))
        .merge(images)
        .route("/api/{*path}", any(routes::api_passthrough))
        .with_state(state)
}
