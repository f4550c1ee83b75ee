//! # Lookup Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Lookup Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Response     │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Status         │  │  ConfigError::Read      │ │
//! │  │  Timeout        │  │  Decode         │  │  ConfigError::Parse     │ │
//! │  │  ClientBuild    │  │                 │  │  ConfigError::Invalid   │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every LookupError renders a message fit for the kiosk screen; the     │
//! │  controller turns it into LookupState::Error and never rethrows.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for inventory calls.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A failed call to the inventory API.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Couldn't reach the server (DNS, refused, TLS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The request didn't finish within the configured time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("Inventory API returned status {status}")]
    Status { status: u16 },

    /// The body wasn't the expected JSON.
    #[error("Invalid response from inventory API: {0}")]
    Decode(String),

    /// The HTTP client couldn't be built from the configuration.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// A configured URL couldn't be joined with the endpoint path.
    #[error("Invalid inventory URL: {0}")]
    InvalidUrl(String),
}

impl LookupError {
    /// Maps a reqwest error onto the variant the kiosk reports.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LookupError::Timeout(timeout)
        } else if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            LookupError::Status {
                status: status.as_u16(),
            }
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

/// A configuration that couldn't be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file couldn't be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file isn't valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A URL setting isn't an absolute http(s) URL.
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
}
