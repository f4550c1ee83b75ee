//! # Inventory API Client
//!
//! The single outbound call the kiosk makes: read a product by barcode.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HttpInventoryClient::read_by_barcode("0123456789012")                  │
//! │                                                                         │
//! │  POST {base_url}/Productos/productReadBarCode                           │
//! │  Content-Type: application/json                                         │
//! │  { "PageNumber": 0, "PageSize": 0, "genericstring": "0123456789012" }   │
//! │                                                                         │
//! │      2xx + JSON ──────► Ok(ProductPage)                                 │
//! │      2xx + garbage ───► Err(Decode)                                     │
//! │      4xx / 5xx ───────► Err(Status)                                     │
//! │      refused / TLS ───► Err(Network)                                    │
//! │      too slow ────────► Err(Timeout)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use pricecheck_core::{Barcode, ProductPage, ReadByBarcodeRequest, READ_BY_BARCODE_PATH};

use crate::config::InventorySettings;
use crate::error::{LookupError, LookupResult};

// =============================================================================
// Inventory API Trait
// =============================================================================

/// Anything that can answer a barcode read.
///
/// The controller only sees this trait, so tests can script responses and
/// their timing without a server.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Reads the products matching `barcode`.
    async fn read_by_barcode(&self, barcode: &Barcode) -> LookupResult<ProductPage>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// reqwest-backed [`InventoryApi`].
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpInventoryClient {
    /// Builds a client from the inventory settings.
    pub fn new(settings: &InventorySettings) -> LookupResult<Self> {
        let endpoint = endpoint_url(&settings.base_url)?;
        let timeout = settings.timeout();

        if settings.accept_invalid_certs {
            warn!(endpoint = %endpoint, "Inventory client accepts invalid TLS certificates");
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| LookupError::ClientBuild(e.to_string()))?;

        Ok(HttpInventoryClient {
            http,
            endpoint,
            timeout,
        })
    }

    /// The full URL of the read operation.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn read_by_barcode(&self, barcode: &Barcode) -> LookupResult<ProductPage> {
        debug!(barcode = %barcode, endpoint = %self.endpoint, "POST read-by-barcode");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ReadByBarcodeRequest::for_barcode(barcode))
            .send()
            .await
            .map_err(|e| LookupError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::from_reqwest(e, self.timeout))?;

        let page: ProductPage =
            serde_json::from_slice(&body).map_err(|e| LookupError::Decode(e.to_string()))?;

        debug!(barcode = %barcode, results = page.results.len(), "Inventory answered");
        Ok(page)
    }
}

/// Joins the API root and the read operation path.
///
/// The root is treated as a directory whether or not it ends in `/`.
fn endpoint_url(base_url: &str) -> LookupResult<Url> {
    let root = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&root)
        .and_then(|base| base.join(READ_BY_BARCODE_PATH))
        .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", base_url, e)))
}
