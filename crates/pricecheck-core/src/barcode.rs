//! # Barcode
//!
//! The trimmed, non-empty code produced by one scan episode.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::validate_barcode;

/// A completed scanner read.
///
/// Immutable once built; the only constructor validates, so a `Barcode`
/// is never empty or padded with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct Barcode(String);

impl Barcode {
    /// Builds a barcode from raw input, trimming it first.
    ///
    /// ## Example
    /// ```rust
    /// use pricecheck_core::Barcode;
    ///
    /// let code = Barcode::new(" 0123456789012\n").unwrap();
    /// assert_eq!(code.as_str(), "0123456789012");
    /// assert!(Barcode::new("   ").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        validate_barcode(raw).map(|code| Barcode(code.to_string()))
    }

    /// Returns the code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Barcode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Barcode::new(&value)
    }
}

impl From<Barcode> for String {
    fn from(code: Barcode) -> Self {
        code.0
    }
}

impl std::str::FromStr for Barcode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Barcode::new(s)
    }
}
