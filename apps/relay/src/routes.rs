//! # Relay Handlers
//!
//! ## Image Fallback
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /api/images/productos/leche.jpg                                    │
//! │        │                                                                │
//! │        ├─ "..", leading "/" ───────────────────────► 400                │
//! │        ▼                                                                │
//! │  fetch {image_base}/productos/leche.jpg                                 │
//! │        ├─ 2xx ──────────────────────────────────────► stream bytes      │
//! │        ▼ (unreachable / non-2xx)                                        │
//! │  fetch {image_base}/LOGONEXT.png                                        │
//! │        ├─ 2xx ──────────────────────────────────────► stream bytes      │
//! │        ▼                                                                │
//! │  502 {"error": "Error fetching image"}                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, RawQuery, State},
    http::{
        header::{
            ACCEPT, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, Method,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use url::Url;

use pricecheck_core::validation::validate_image_identifier;

use crate::error::{RelayError, RelayResult};
use crate::RelayState;

/// Content type assumed when the image host doesn't send one.
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

// =============================================================================
// Health
// =============================================================================

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    "OK"
}

// =============================================================================
// Image Proxy
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
}

/// `GET /api/image-proxy?url=` - relays any absolute http(s) image URL.
pub async fn image_proxy(
    State(state): State<Arc<RelayState>>,
    Query(params): Query<ProxyParams>,
) -> RelayResult<Response> {
    let raw = params
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(RelayError::MissingUrl)?;

    let url = Url::parse(raw).map_err(|e| RelayError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RelayError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    debug!(url = %url, "Proxying image");
    let upstream = state
        .image_http
        .get(url.clone())
        .header(ACCEPT, "image/*")
        .send()
        .await
        .map_err(|e| {
            error!(url = %url, error = %e, "Image proxy fetch failed");
            RelayError::Fetch(e.to_string())
        })?;

    let status = upstream.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "Image host refused");
        return Err(RelayError::UpstreamStatus(status.as_u16()));
    }

    Ok(image_response(upstream))
}

// =============================================================================
// Images by Identifier
// =============================================================================

/// `GET /api/images/{*id}` - product photo with placeholder fallback.
pub async fn image_by_id(
    State(state): State<Arc<RelayState>>,
    Path(id): Path<String>,
) -> RelayResult<Response> {
    if id.trim().is_empty() {
        return serve_placeholder(&state).await;
    }

    let id = validate_image_identifier(&id)
        .map_err(|e| RelayError::InvalidIdentifier(e.to_string()))?;

    match fetch_image(&state, id).await {
        Ok(upstream) => Ok(image_response(upstream)),
        Err(reason) => {
            info!(id = %id, reason = %reason, "Image unavailable, serving placeholder");
            serve_placeholder(&state).await
        }
    }
}

/// `GET /api/images` - the placeholder itself.
pub async fn placeholder_image(State(state): State<Arc<RelayState>>) -> RelayResult<Response> {
    serve_placeholder(&state).await
}

async fn serve_placeholder(state: &RelayState) -> RelayResult<Response> {
    match fetch_image(state, &state.placeholder).await {
        Ok(upstream) => Ok(image_response(upstream)),
        Err(reason) => {
            error!(placeholder = %state.placeholder, reason = %reason, "Placeholder unavailable");
            Err(RelayError::ImageUnavailable)
        }
    }
}

/// Fetches `{image_base}/{id}`; any failure comes back as a log-ready reason.
async fn fetch_image(state: &RelayState, id: &str) -> Result<reqwest::Response, String> {
    let url = join_under(&state.image_base, id)?;

    let upstream = state
        .image_http
        .get(url)
        .header(ACCEPT, "image/*")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if upstream.status().is_success() {
        Ok(upstream)
    } else {
        Err(format!("status {}", upstream.status().as_u16()))
    }
}

/// Streams an upstream image back, keeping its content type.
fn image_response(upstream: reqwest::Response) -> Response {
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_IMAGE_TYPE));

    ([(CONTENT_TYPE, content_type)], Body::from_stream(upstream.bytes_stream())).into_response()
}

/// Adds the CORS headers every image response carries.
pub async fn cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

// =============================================================================
// Inventory Pass-through
// =============================================================================

/// `ANY /api/{*path}` - forwards to the inventory API unchanged.
pub async fn api_passthrough(
    State(state): State<Arc<RelayState>>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResult<Response> {
    let mut url =
        join_under(&state.inventory_base, &path).map_err(RelayError::InvalidIdentifier)?;
    url.set_query(query.as_deref());

    debug!(method = %method, url = %url, "Forwarding to inventory API");

    let mut request = state.api_http.request(method, url.clone()).body(body);
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        request = request.header(CONTENT_TYPE, content_type.clone());
    }

    let upstream = request.send().await.map_err(|e| {
        error!(url = %url, error = %e, "Inventory API unreachable");
        RelayError::Gateway(e.to_string())
    })?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| RelayError::Gateway(e.to_string()))?;

    let mut response = (status, bytes).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}

/// Joins `relative` onto `base`, refusing anything that escapes it.
///
/// `Url::join` happily resolves absolute URLs and `..`, so the result is
/// checked against the base prefix.
fn join_under(base: &Url, relative: &str) -> Result<Url, String> {
    let url = base
        .join(relative)
        .map_err(|e| format!("{}: {}", relative, e))?;
    if url.as_str().starts_with(base.as_str()) {
        Ok(url)
    } else {
        Err(format!("{} escapes {}", relative, base))
    }
}
