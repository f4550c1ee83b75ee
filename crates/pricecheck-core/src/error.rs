//! # Error Types
//!
//! Domain-specific error types for pricecheck-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricecheck-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pricecheck-lookup errors (separate crate)                             │
//! │  └── LookupError      - Inventory API call failures                    │
//! │                                                                         │
//! │  relay errors (app)                                                    │
//! │  └── RelayError       - What the browser sees (HTTP status + body)     │
//! │                                                                         │
//! │  Flow: ValidationError → (ignored scan)                                │
//! │        LookupError     → LookupState::Error(message)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An amount from the inventory API can't be represented as money.
    ///
    /// ## When This Occurs
    /// - The API sent `NaN` or an infinite value
    /// - The amount overflows the cent range
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: f64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when scanned or requested input doesn't meet the rules.
/// An invalid scan is never shown to the customer; it is simply ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., control characters, path traversal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidAmount {
            field: "Costo".to_string(),
            value: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "Invalid amount for Costo: inf");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        };
        assert_eq!(err.to_string(), "barcode must be at most 64 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
