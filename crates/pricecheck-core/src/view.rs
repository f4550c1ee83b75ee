//! # Product View
//!
//! Turns a raw [`ProductRecord`] into what the kiosk actually displays.
//!
//! ## Display Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CONSULTOR DE PRECIOS                                                   │
//! │                                                                         │
//! │  Leche 1L                                  ┌─────────┐                  │
//! │  Código: 0123456789012                     │  Foto   │                  │
//! │                                            └─────────┘                  │
//! │  Precio:  $1.20      ◄── PrecioClaseDefault + IVA                       │
//! │                                                                         │
//! │  IVA: 12%   ICE: No aplica   Impuesto Verde: No aplica                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shelf Price
//! Only IVA is added to the displayed price. ICE and the environmental tax
//! are listed but never summed in.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{ProductRecord, TaxKind, TaxRate};

/// Label shown for a tax that doesn't apply to the product.
pub const NOT_APPLICABLE: &str = "No aplica";

// =============================================================================
// View Types
// =============================================================================

/// One row of the tax list.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    pub kind: TaxKind,
    pub label: String,
    pub applies: bool,
    pub rate: TaxRate,
    /// `"12%"` or `"No aplica"`.
    pub display: String,
}

/// One tiered price (`PrecioClase01`..`07`) that the API filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub class: u8,
    pub price: Money,
}

/// Promotion dates. Both bounds are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromotionWindow {
    #[ts(type = "string")]
    pub starts: NaiveDateTime,
    #[ts(type = "string")]
    pub ends: NaiveDateTime,
}

impl PromotionWindow {
    /// Parses the two API date strings. `None` unless both bounds parse.
    pub fn from_api(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let starts = parse_api_datetime(start?, DayBound::Start)?;
        let ends = parse_api_datetime(end?, DayBound::End)?;
        Some(PromotionWindow { starts, ends })
    }

    /// Returns true if `now` falls inside the window (bounds inclusive).
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.starts <= now && now <= self.ends
    }
}

/// Everything the kiosk renders for a found product.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub packaging: Option<String>,
    /// `PrecioClaseDefault` as sent.
    pub base_price: Money,
    /// Base price plus IVA when it applies, rounded once.
    pub shelf_price: Money,
    pub cost: Option<Money>,
    pub taxes: Vec<TaxLine>,
    pub tiers: Vec<PriceTier>,
    pub stock: Option<f64>,
    /// Photo identifier, or the placeholder when the product has none.
    pub photo: String,
    pub promotion: Option<PromotionWindow>,
}

impl ProductView {
    /// Builds the display model.
    ///
    /// Fails if the record has no usable name, or if a price is not a finite
    /// number.
    ///
    /// ## Example
    /// ```rust
    /// use pricecheck_core::{ProductRecord, ProductView};
    ///
    /// let record = ProductRecord {
    ///     name: Some("Leche 1L".into()),
    ///     default_price: Some(1.07),
    ///     applies_vat: Some(true),
    ///     vat_pct: Some(12.0),
    ///     ..Default::default()
    /// };
    /// let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
    /// assert_eq!(view.shelf_price.to_string(), "$1.20");
    /// assert_eq!(view.photo, "LOGONEXT.png");
    /// ```
    pub fn from_record(record: &ProductRecord, placeholder: &str) -> CoreResult<Self> {
        let name = record
            .display_name()
            .ok_or_else(|| ValidationError::Required {
                field: "Nombre".to_string(),
            })?
            .to_string();

        let amount = record.default_price.unwrap_or(0.0);
        let base_price = Money::from_field_amount("PrecioClaseDefault", amount)?;

        // Taxed from the unrounded amount so the cent is only rounded once
        let vat = record.tax(TaxKind::Vat);
        let shelf_price = if vat.applies {
            let taxed = amount + amount * vat.percentage / 100.0;
            Money::from_field_amount("PrecioClaseDefault", taxed)?
        } else {
            base_price
        };

        let cost = record
            .cost
            .map(|amount| Money::from_field_amount("Costo", amount))
            .transpose()?;

        let taxes = TaxKind::ALL
            .iter()
            .map(|&kind| {
                let flag = record.tax(kind);
                let rate = flag.rate();
                let display = if flag.applies {
                    format_percentage(rate)
                } else {
                    NOT_APPLICABLE.to_string()
                };
                TaxLine {
                    kind,
                    label: kind.label().to_string(),
                    applies: flag.applies,
                    rate,
                    display,
                }
            })
            .collect();

        let mut tiers = Vec::new();
        for (class, amount) in record.price_tiers() {
            if let Some(amount) = amount {
                let field = format!("PrecioClase{:02}", class);
                tiers.push(PriceTier {
                    class,
                    price: Money::from_field_amount(&field, amount)?,
                });
            }
        }

        Ok(ProductView {
            name,
            code: non_blank_owned(record.code.as_deref()),
            description: non_blank_owned(record.description.as_deref()),
            packaging: non_blank_owned(record.packaging.as_deref()),
            base_price,
            shelf_price,
            cost,
            taxes,
            tiers,
            stock: record.stock.filter(|s| s.is_finite()),
            photo: record
                .photo_identifier()
                .unwrap_or(placeholder)
                .to_string(),
            promotion: PromotionWindow::from_api(
                record.promotion_start.as_deref(),
                record.promotion_end.as_deref(),
            ),
        })
    }

    /// Returns true if the product has a promotion running at `now`.
    pub fn is_promotion_active(&self, now: NaiveDateTime) -> bool {
        self.promotion.is_some_and(|window| window.contains(now))
    }

    /// The tax line for one kind.
    pub fn tax(&self, kind: TaxKind) -> Option<&TaxLine> {
        self.taxes.iter().find(|line| line.kind == kind)
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Clone, Copy)]
enum DayBound {
    Start,
    End,
}

/// Accepts RFC 3339, ISO local date-time (with or without fraction), and
/// plain dates. A plain date covers the whole day.
fn parse_api_datetime(raw: &str, bound: DayBound) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    match bound {
        DayBound::Start => date.and_hms_opt(0, 0, 0),
        DayBound::End => date.and_hms_opt(23, 59, 59),
    }
}

/// `1200 bps` → `"12%"`, `50 bps` → `"0.5%"`.
fn format_percentage(rate: TaxRate) -> String {
    let bps = rate.bps();
    if bps % 100 == 0 {
        return format!("{}%", bps / 100);
    }
    let decimals = format!("{:02}", bps % 100);
    format!("{}.{}%", bps / 100, decimals.trim_end_matches('0'))
}

fn non_blank_owned(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn milk() -> ProductRecord {
        ProductRecord {
            name: Some("Leche 1L".into()),
            code: Some("0123456789012".into()),
            default_price: Some(1.07),
            applies_vat: Some(true),
            vat_pct: Some(12.0),
            applies_excise: Some(false),
            excise_pct: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_shelf_price_includes_vat() {
        let view = ProductView::from_record(&milk(), "LOGONEXT.png").unwrap();
        assert_eq!(view.base_price.cents(), 107);
        assert_eq!(view.shelf_price.cents(), 120);
    }

    #[test]
    fn test_shelf_price_rounds_once() {
        // 1.045 + 12% = 1.1704; rounding the base first would give 1.18
        let mut record = milk();
        record.default_price = Some(1.045);
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
        assert_eq!(view.base_price.cents(), 105);
        assert_eq!(view.shelf_price.cents(), 117);
    }

    #[test]
    fn test_cost_shown_when_sent() {
        assert!(ProductView::from_record(&milk(), "LOGONEXT.png").unwrap().cost.is_none());

        let mut record = milk();
        record.cost = Some(0.8);
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
        assert_eq!(view.cost, Some(Money::from_cents(80)));
    }

    #[test]
    fn test_shelf_price_without_vat() {
        let mut record = milk();
        record.applies_vat = Some(false);
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
        assert_eq!(view.shelf_price, view.base_price);
    }

    #[test]
    fn test_missing_price_is_zero() {
        let mut record = milk();
        record.default_price = None;
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
        assert!(view.shelf_price.is_zero());
    }

    #[test]
    fn test_tax_lines() {
        let mut record = milk();
        record.applies_environmental = Some(true);
        record.environmental_pct = Some(0.5);
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();

        assert_eq!(view.taxes.len(), 3);
        assert_eq!(view.tax(TaxKind::Vat).unwrap().display, "12%");
        assert_eq!(view.tax(TaxKind::Excise).unwrap().display, NOT_APPLICABLE);
        let green = view.tax(TaxKind::Environmental).unwrap();
        assert_eq!(green.label, "Impuesto Verde");
        assert_eq!(green.display, "0.5%");
    }

    #[test]
    fn test_photo_falls_back_to_placeholder() {
        let view = ProductView::from_record(&milk(), "LOGONEXT.png").unwrap();
        assert_eq!(view.photo, "LOGONEXT.png");

        let mut record = milk();
        record.photo = Some("productos/leche.jpg".into());
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
        assert_eq!(view.photo, "productos/leche.jpg");
    }

    #[test]
    fn test_tiers_skip_missing() {
        let mut record = milk();
        record.price_class_01 = Some(1.0);
        record.price_class_03 = Some(0.95);
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();

        let classes: Vec<u8> = view.tiers.iter().map(|t| t.class).collect();
        assert_eq!(classes, vec![1, 3]);
        assert_eq!(view.tiers[1].price.cents(), 95);
    }

    #[test]
    fn test_nameless_record_rejected() {
        let mut record = milk();
        record.name = None;
        let err = ProductView::from_record(&record, "LOGONEXT.png").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
    }

    #[test]
    fn test_promotion_window_dates() {
        let mut record = milk();
        record.promotion_start = Some("2024-03-01".into());
        record.promotion_end = Some("2024-03-31T00:00:00".into());
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();

        assert!(!view.is_promotion_active(at("2024-02-29 23:59:59")));
        assert!(view.is_promotion_active(at("2024-03-01 00:00:00")));
        assert!(view.is_promotion_active(at("2024-03-15 12:00:00")));
        assert!(!view.is_promotion_active(at("2024-03-31 00:00:01")));
    }

    #[test]
    fn test_promotion_plain_dates_cover_whole_days() {
        let window = PromotionWindow::from_api(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert_eq!(window.starts, at("2024-03-01 00:00:00"));
        assert_eq!(window.ends, at("2024-03-31 23:59:59"));
        assert!(!window.contains(at("2024-02-29 23:59:59")));
        assert!(window.contains(at("2024-03-01 00:00:00")));
        assert!(window.contains(at("2024-03-31 18:00:00")));
        assert!(!window.contains(at("2024-04-01 00:00:00")));
    }

    #[test]
    fn test_one_sided_promotion_is_inactive() {
        assert!(PromotionWindow::from_api(None, Some("2024-03-31")).is_none());
        assert!(PromotionWindow::from_api(Some("2024-03-01"), None).is_none());
        assert!(PromotionWindow::from_api(Some("2024-03-01"), Some("soon")).is_none());

        let mut record = milk();
        record.promotion_end = Some("2024-03-31".into());
        let view = ProductView::from_record(&record, "LOGONEXT.png").unwrap();
        assert!(view.promotion.is_none());
        assert!(!view.is_promotion_active(at("2020-01-01 00:00:00")));
        assert!(!view.is_promotion_active(at("2024-03-15 12:00:00")));
    }

    #[test]
    fn test_unparseable_promotion_is_none() {
        assert!(PromotionWindow::from_api(Some("soon"), Some("")).is_none());
        let view = ProductView::from_record(&milk(), "LOGONEXT.png").unwrap();
        assert!(!view.is_promotion_active(at("2024-03-15 12:00:00")));
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(TaxRate::from_bps(1200)), "12%");
        assert_eq!(format_percentage(TaxRate::from_bps(50)), "0.5%");
        assert_eq!(format_percentage(TaxRate::from_bps(1575)), "15.75%");
        assert_eq!(format_percentage(TaxRate::zero()), "0%");
    }
}
