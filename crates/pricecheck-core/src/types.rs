//! # Inventory Wire Types
//!
//! Types exchanged with the inventory API, plus the tax rate they carry.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Wire Types                                      │
//! │                                                                         │
//! │  ReadByBarcodeRequest ──POST──► Productos/productReadBarCode            │
//! │  { PageNumber: 0, PageSize: 0, genericstring: "7702004" }               │
//! │                                                                         │
//! │  ProductPage ◄──────────────── 200 OK                                   │
//! │  { Results: [ProductRecord, ...], Count, Total }                        │
//! │                 │                                                       │
//! │                 └─► only Results[0] is ever used                        │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │   ProductRecord     │   │    TaxKind      │   │    TaxRate      │   │
//! │  │  Codigo, Nombre     │   │  Vat (IVA)      │   │  bps (u32)      │   │
//! │  │  PrecioClase01..07  │   │  Excise (ICE)   │   │  1200 = 12%     │   │
//! │  │  AIVA/PIVA, ...     │   │  Environmental  │   └─────────────────┘   │
//! │  └─────────────────────┘   └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! The API speaks PascalCase Spanish field names. Rust fields carry English
//! names and serde renames them; every field is optional because the API
//! omits or nulls fields freely.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::barcode::Barcode;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1200 bps = 12% (IVA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage as the API sends it.
    ///
    /// Negative or non-finite percentages collapse to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Tax Kind
// =============================================================================

/// The three independent taxes a product can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    /// General sales tax (IVA). The only one added to the shelf price.
    Vat,
    /// Excise tax (ICE).
    Excise,
    /// Environmental tax ("impuesto verde").
    Environmental,
}

impl TaxKind {
    /// All kinds, in the order the kiosk lists them.
    pub const ALL: [TaxKind; 3] = [TaxKind::Vat, TaxKind::Excise, TaxKind::Environmental];

    /// Label shown next to the tax on the kiosk screen.
    pub const fn label(&self) -> &'static str {
        match self {
            TaxKind::Vat => "IVA",
            TaxKind::Excise => "ICE",
            TaxKind::Environmental => "Impuesto Verde",
        }
    }
}

impl std::fmt::Display for TaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Applicability and percentage of one tax on one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxFlag {
    pub kind: TaxKind,
    pub applies: bool,
    pub percentage: f64,
}

impl TaxFlag {
    /// Effective rate: zero when the tax doesn't apply.
    pub fn rate(&self) -> TaxRate {
        if self.applies {
            TaxRate::from_percentage(self.percentage)
        } else {
            TaxRate::zero()
        }
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// One product as returned by the inventory API.
///
/// Treated as an opaque value: the kiosk never edits it, it replaces it
/// wholesale on every successful lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ProductRecord {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "ProductoId")]
    pub product_id: Option<String>,
    #[serde(rename = "Codigo")]
    pub code: Option<String>,
    #[serde(rename = "Clase")]
    pub class: Option<String>,
    #[serde(rename = "Nombre")]
    pub name: Option<String>,
    #[serde(rename = "Descripcion")]
    pub description: Option<String>,
    /// Photo identifier relative to the image host.
    #[serde(rename = "Foto")]
    pub photo: Option<String>,
    #[serde(rename = "Empaque")]
    pub packaging: Option<String>,
    #[serde(rename = "CodEmpaque")]
    pub packaging_code: Option<String>,
    #[serde(rename = "Costo")]
    pub cost: Option<f64>,
    #[serde(rename = "Factor")]
    pub factor: Option<f64>,
    #[serde(rename = "PrecioClase01")]
    pub price_class_01: Option<f64>,
    #[serde(rename = "PrecioClase02")]
    pub price_class_02: Option<f64>,
    #[serde(rename = "PrecioClase03")]
    pub price_class_03: Option<f64>,
    #[serde(rename = "PrecioClase04")]
    pub price_class_04: Option<f64>,
    #[serde(rename = "PrecioClase05")]
    pub price_class_05: Option<f64>,
    #[serde(rename = "PrecioClase06")]
    pub price_class_06: Option<f64>,
    #[serde(rename = "PrecioClase07")]
    pub price_class_07: Option<f64>,
    /// Price shown on the kiosk (before IVA).
    #[serde(rename = "PrecioClaseDefault")]
    pub default_price: Option<f64>,
    #[serde(rename = "Stock")]
    pub stock: Option<f64>,
    #[serde(rename = "AIVA")]
    pub applies_vat: Option<bool>,
    #[serde(rename = "PIVA")]
    pub vat_pct: Option<f64>,
    #[serde(rename = "AICE")]
    pub applies_excise: Option<bool>,
    #[serde(rename = "PICE")]
    pub excise_pct: Option<f64>,
    #[serde(rename = "AVERDE")]
    pub applies_environmental: Option<bool>,
    #[serde(rename = "PVERDE")]
    pub environmental_pct: Option<f64>,
    #[serde(rename = "PromocionFechaInicio")]
    pub promotion_start: Option<String>,
    #[serde(rename = "PromocionFechaFinal")]
    pub promotion_end: Option<String>,
}

impl ProductRecord {
    /// Display name, trimmed. `None` when missing or blank.
    ///
    /// A record without a usable name counts as "not found".
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Returns true if the record names a product.
    pub fn has_usable_name(&self) -> bool {
        self.display_name().is_some()
    }

    /// Photo identifier, trimmed. `None` when missing or blank.
    pub fn photo_identifier(&self) -> Option<&str> {
        non_blank(self.photo.as_deref())
    }

    /// Tax flag for one kind of tax.
    pub fn tax(&self, kind: TaxKind) -> TaxFlag {
        let (applies, pct) = match kind {
            TaxKind::Vat => (self.applies_vat, self.vat_pct),
            TaxKind::Excise => (self.applies_excise, self.excise_pct),
            TaxKind::Environmental => (self.applies_environmental, self.environmental_pct),
        };
        TaxFlag {
            kind,
            applies: applies.unwrap_or(false),
            percentage: pct.unwrap_or(0.0),
        }
    }

    /// The seven tiered prices as `(class number, amount)`.
    pub fn price_tiers(&self) -> [(u8, Option<f64>); 7] {
        [
            (1, self.price_class_01),
            (2, self.price_class_02),
            (3, self.price_class_03),
            (4, self.price_class_04),
            (5, self.price_class_05),
            (6, self.price_class_06),
            (7, self.price_class_07),
        ]
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Product Page
// =============================================================================

/// Response body of the barcode read operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPage {
    #[serde(rename = "Results", deserialize_with = "null_as_default")]
    pub results: Vec<ProductRecord>,
    #[serde(rename = "Count", deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(rename = "Total", deserialize_with = "null_as_default")]
    pub total: i64,
}

impl ProductPage {
    /// The only record the kiosk consumes.
    pub fn first(&self) -> Option<&ProductRecord> {
        self.results.first()
    }

    /// Takes ownership of the first record, dropping the rest.
    pub fn into_first(self) -> Option<ProductRecord> {
        self.results.into_iter().next()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Read Request
// =============================================================================

/// Request body of the barcode read operation.
///
/// Pagination is disabled (`0/0`): the server returns every match and the
/// kiosk keeps the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadByBarcodeRequest {
    #[serde(rename = "PageNumber")]
    pub page_number: u32,
    #[serde(rename = "PageSize")]
    pub page_size: u32,
    #[serde(rename = "genericstring")]
    pub query: String,
}

impl ReadByBarcodeRequest {
    /// Builds the unpaginated request for one scanned code.
    pub fn for_barcode(barcode: &Barcode) -> Self {
        ReadByBarcodeRequest {
            page_number: 0,
            page_size: 0,
            query: barcode.as_str().to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
