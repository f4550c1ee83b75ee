//! # Validation Module
//!
//! Input rules for scanned codes and image identifiers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Keystroke aggregator                                          │
//! │  └── Only printable characters ever reach the buffer                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── validate_barcode: trimmed, non-empty, no control characters       │
//! │  └── validate_image_identifier: relative path, no traversal            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Upstream (inventory API / image host)                        │
//! │  └── Decides whether the code or file exists                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest image identifier the relay will forward.
pub const MAX_IMAGE_IDENTIFIER_LEN: usize = 255;

// =============================================================================
// Barcode
// =============================================================================

/// Validates a scanned code and returns its trimmed form.
///
/// ## Rules
/// - Leading/trailing whitespace is dropped
/// - The remainder must not be empty
/// - No control characters
///
/// ## Example
/// ```rust
/// use pricecheck_core::validation::validate_barcode;
///
/// assert_eq!(validate_barcode("  0123456789012 ").unwrap(), "0123456789012");
/// assert!(validate_barcode("   ").is_err());
/// ```
pub fn validate_barcode(raw: &str) -> ValidationResult<&str> {
    let code = raw.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if code.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(code)
}

// =============================================================================
// Image Identifier
// =============================================================================

/// Validates a photo identifier relative to the image host.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_IMAGE_IDENTIFIER_LEN`] characters
/// - Relative: no leading `/`, no backslashes, no `..` segments
///
/// ## Example
/// ```rust
/// use pricecheck_core::validation::validate_image_identifier;
///
/// assert!(validate_image_identifier("04dsc5.jpg").is_ok());
/// assert!(validate_image_identifier("lacteos/leche.png").is_ok());
/// assert!(validate_image_identifier("../etc/passwd").is_err());
/// ```
pub fn validate_image_identifier(id: &str) -> ValidationResult<&str> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "image".to_string(),
        });
    }

    if id.len() > MAX_IMAGE_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: "image".to_string(),
            max: MAX_IMAGE_IDENTIFIER_LEN,
        });
    }

    if id.starts_with('/') || id.contains('\\') {
        return Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: "must be a relative path".to_string(),
        });
    }

    if id.split('/').any(|segment| segment == "..") {
        return Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: "must not contain '..' segments".to_string(),
        });
    }

    if id.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================
