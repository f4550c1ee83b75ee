//! # pricecheck-core: Pure Logic for the Price Checker Kiosk
//!
//! This crate is the **heart** of the kiosk. It holds every decision the
//! kiosk makes as plain data and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Price Checker Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Barcode scanner (keyboard wedge)                    │   │
//! │  │     '7' '7' '0' ... 'Enter'   (each key < 100ms apart)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ KeyInput + Instant                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ pricecheck-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  scanner  │  │  lookup   │  │   types   │  │   view    │  │   │
//! │  │   │ Aggregator│  │  Tracker  │  │ Product   │  │ ShelfPrice│  │   │
//! │  │   │ ScanBuffer│  │  State    │  │ Page      │  │ TaxLines  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TERMINAL • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ Barcode                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            pricecheck-lookup (HTTP client + controller)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`barcode`] - The validated `Barcode` value
//! - [`scanner`] - Keystroke aggregator (scanner vs. stray typing)
//! - [`lookup`] - Lookup state machine and generation tracking
//! - [`types`] - Inventory API wire types
//! - [`money`] - Integer money for price display
//! - [`view`] - Display model for a found product
//! - [`validation`] - Input rules shared by the apps
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use pricecheck_core::scanner::{KeyInput, KeystrokeAggregator};
//!
//! let mut scanner = KeystrokeAggregator::new();
//! let t0 = Instant::now();
//!
//! for (i, c) in "7702004".chars().enumerate() {
//!     let at = t0 + Duration::from_millis(10 * i as u64);
//!     assert!(scanner.handle(KeyInput::Char(c), at).is_none());
//! }
//!
//! let code = scanner.handle(KeyInput::Enter, t0 + Duration::from_millis(80));
//! assert_eq!(code.unwrap().as_str(), "7702004");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod error;
pub mod lookup;
pub mod money;
pub mod scanner;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::Barcode;
pub use error::{CoreError, CoreResult, ValidationError};
pub use lookup::{LookupOutcome, LookupState, LookupTicket, LookupTracker};
pub use money::Money;
pub use scanner::{KeyInput, KeystrokeAggregator, ScanBuffer};
pub use types::*;
pub use view::ProductView;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Inactivity gap (milliseconds) that separates two scan episodes.
///
/// ## Why 100ms?
/// A scanner in keyboard-wedge mode emits a whole code in a few
/// milliseconds per key. A person typing pauses far longer than this between
/// keys, so their characters never accumulate into a "scan".
pub const DEFAULT_INACTIVITY_MS: u64 = 100;

/// Path of the barcode read operation, relative to the inventory API base.
pub const READ_BY_BARCODE_PATH: &str = "Productos/productReadBarCode";

/// Image identifier served when a product has no photo or it can't be fetched.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "LOGONEXT.png";
