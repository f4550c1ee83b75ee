//! # pricecheck-lookup: Inventory Client + Lookup Controller
//!
//! Everything between a completed scan and the state the kiosk renders.
//!
//! ## Modules
//!
//! - [`client`] - `InventoryApi` seam and the reqwest-backed client
//! - [`controller`] - `LookupController`: submit, observe, reset
//! - [`config`] - `KioskConfig` loading (file, env, defaults)
//! - [`error`] - Lookup and configuration errors
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pricecheck_core::Barcode;
//! use pricecheck_lookup::{KioskConfig, LookupController};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = KioskConfig::load(None)?;
//! let controller = LookupController::from_settings(&config.inventory)?;
//!
//! let mut updates = controller.subscribe();
//! controller.submit(Barcode::new("0123456789012")?);
//!
//! while updates.changed().await.is_ok() {
//!     println!("{:?}", *updates.borrow());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;

pub use client::{HttpInventoryClient, InventoryApi};
pub use config::{ImageSettings, InventorySettings, KioskConfig, RelaySettings, ScannerSettings};
pub use controller::LookupController;
pub use error::{ConfigError, ConfigResult, LookupError, LookupResult};
