//! # Kiosk Configuration
//!
//! One file configures the terminal kiosk and the relay.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRICECHECK_INVENTORY_URL=https://10.0.0.5:8089/api                 │
//! │     PRICECHECK_INACTIVITY_MS=80                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pricecheck/kiosk.toml (Linux)                            │
//! │     ~/Library/Application Support/com.pricecheck.kiosk/kiosk.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kiosk.toml
//! [inventory]
//! base_url = "https://177.234.196.99:8089/api"
//! timeout_secs = 10
//! accept_invalid_certs = false
//!
//! [images]
//! base_url = "https://177.234.196.99:8089/images"
//! placeholder = "LOGONEXT.png"
//! accept_invalid_certs = false
//!
//! [scanner]
//! inactivity_ms = 100
//!
//! [relay]
//! bind_addr = "127.0.0.1"
//! port = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use pricecheck_core::validation::validate_image_identifier;
use pricecheck_core::{DEFAULT_INACTIVITY_MS, DEFAULT_PLACEHOLDER_IMAGE};

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "kiosk.toml";

// =============================================================================
// Inventory Settings
// =============================================================================

/// Where product lookups go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// API root; the read operation path is appended to it.
    #[serde(default = "default_inventory_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification (self-signed hosts).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_inventory_url() -> String {
    "https://177.234.196.99:8089/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            base_url: default_inventory_url(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

impl InventorySettings {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Image Settings
// =============================================================================

/// Where product photos come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Image host root; identifiers are appended to it.
    #[serde(default = "default_images_url")]
    pub base_url: String,

    /// Identifier served when a photo is missing or unreachable.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Skip TLS certificate verification (self-signed hosts).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_images_url() -> String {
    "https://177.234.196.99:8089/images".to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            base_url: default_images_url(),
            placeholder: default_placeholder(),
            accept_invalid_certs: false,
        }
    }
}

// =============================================================================
// Scanner Settings
// =============================================================================

/// Keystroke aggregation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Gap (milliseconds) that ends a scan episode.
    #[serde(default = "default_inactivity_ms")]
    pub inactivity_ms: u64,
}

fn default_inactivity_ms() -> u64 {
    DEFAULT_INACTIVITY_MS
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings {
            inactivity_ms: default_inactivity_ms(),
        }
    }
}

impl ScannerSettings {
    /// Inactivity gap as a `Duration`.
    pub fn inactivity(&self) -> Duration {
        Duration::from_millis(self.inactivity_ms)
    }
}

// =============================================================================
// Relay Settings
// =============================================================================

/// Listening address of the image relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaySettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_relay_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_port() -> u16 {
    3000
}

impl Default for RelaySettings {
    fn default() -> Self {
        RelaySettings {
            bind_addr: default_bind_addr(),
            port: default_relay_port(),
        }
    }
}

impl RelaySettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Kiosk Configuration
// =============================================================================

/// Complete kiosk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub images: ImageSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,

    #[serde(default)]
    pub relay: RelaySettings,
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default if it exists)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that doesn't exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading kiosk config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text; missing sections and keys take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        check_http_url("inventory.base_url", &self.inventory.base_url)?;
        check_http_url("images.base_url", &self.images.base_url)?;

        if self.inventory.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "inventory.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.scanner.inactivity_ms == 0 {
            return Err(ConfigError::Invalid(
                "scanner.inactivity_ms must be greater than 0".into(),
            ));
        }

        validate_image_identifier(&self.images.placeholder)
            .map_err(|e| ConfigError::Invalid(format!("images.placeholder: {}", e)))?;

        if self.relay.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("relay.bind_addr must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `PRICECHECK_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production, a map in tests).
    ///
    /// Unparseable numbers and booleans are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PRICECHECK_INVENTORY_URL") {
            debug!(url = %url, "Overriding inventory URL from environment");
            self.inventory.base_url = url;
        }

        if let Some(secs) = lookup("PRICECHECK_INVENTORY_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.inventory.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid PRICECHECK_INVENTORY_TIMEOUT_SECS"),
            }
        }

        if let Some(url) = lookup("PRICECHECK_IMAGES_URL") {
            debug!(url = %url, "Overriding image host from environment");
            self.images.base_url = url;
        }

        if let Some(placeholder) = lookup("PRICECHECK_PLACEHOLDER_IMAGE") {
            self.images.placeholder = placeholder;
        }

        if let Some(flag) = lookup("PRICECHECK_ACCEPT_INVALID_CERTS") {
            match parse_bool(&flag) {
                Some(b) => {
                    if b {
                        warn!("TLS certificate verification disabled for upstream hosts");
                    }
                    self.inventory.accept_invalid_certs = b;
                    self.images.accept_invalid_certs = b;
                }
                None => warn!(value = %flag, "Ignoring invalid PRICECHECK_ACCEPT_INVALID_CERTS"),
            }
        }

        if let Some(ms) = lookup("PRICECHECK_INACTIVITY_MS") {
            match ms.parse::<u64>() {
                Ok(m) => self.scanner.inactivity_ms = m,
                Err(_) => warn!(value = %ms, "Ignoring invalid PRICECHECK_INACTIVITY_MS"),
            }
        }

        if let Some(addr) = lookup("PRICECHECK_RELAY_BIND") {
            self.relay.bind_addr = addr;
        }

        if let Some(port) = lookup("PRICECHECK_RELAY_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding relay port from environment");
                    self.relay.port = p;
                }
                Err(_) => warn!(value = %port, "Ignoring invalid PRICECHECK_RELAY_PORT"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pricecheck", "kiosk")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn check_http_url(field: &'static str, raw: &str) -> ConfigResult<()> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            field,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(config.scanner.inactivity_ms, 100);
        assert_eq!(config.images.placeholder, "LOGONEXT.png");
        assert_eq!(config.relay.bind_address(), "127.0.0.1:3000");
        assert!(!config.inventory.accept_invalid_certs);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = KioskConfig::from_toml(
            r#"
            [inventory]
            base_url = "http://10.0.0.5:8089/api"

            [scanner]
            inactivity_ms = 80
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.base_url, "http://10.0.0.5:8089/api");
        assert_eq!(config.inventory.timeout_secs, 10);
        assert_eq!(config.scanner.inactivity(), Duration::from_millis(80));
        assert_eq!(config.images, ImageSettings::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = KioskConfig::from_toml("[scanner]\ninactivity_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = KioskConfig::default();
        config.inventory.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        let mut config = KioskConfig::default();
        config.images.base_url = "ftp://host/images".into();
        assert!(config.validate().is_err());

        let mut config = KioskConfig::default();
        config.scanner.inactivity_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = KioskConfig::default();
        config.images.placeholder = "../secret".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = KioskConfig::default();
        config.apply_overrides(env(&[
            ("PRICECHECK_INVENTORY_URL", "http://localhost:9000/api"),
            ("PRICECHECK_INVENTORY_TIMEOUT_SECS", "3"),
            ("PRICECHECK_ACCEPT_INVALID_CERTS", "true"),
            ("PRICECHECK_RELAY_PORT", "8080"),
        ]));

        assert_eq!(config.inventory.base_url, "http://localhost:9000/api");
        assert_eq!(config.inventory.timeout(), Duration::from_secs(3));
        assert!(config.inventory.accept_invalid_certs);
        assert!(config.images.accept_invalid_certs);
        assert_eq!(config.relay.port, 8080);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let mut config = KioskConfig::default();
        config.apply_overrides(env(&[
            ("PRICECHECK_RELAY_PORT", "eighty"),
            ("PRICECHECK_INACTIVITY_MS", "-5"),
            ("PRICECHECK_ACCEPT_INVALID_CERTS", "maybe"),
        ]));
        assert_eq!(config, KioskConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = KioskConfig::load(Some(Path::new("/nonexistent/kiosk.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&KioskConfig::default()).unwrap();
        assert!(toml_str.contains("[inventory]"));
        assert!(toml_str.contains("[relay]"));
    }
}
