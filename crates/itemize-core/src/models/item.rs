//! Line item data model.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places kept on a derived unit price.
pub const DERIVED_PRICE_SCALE: u32 = 4;

/// Whether a matched price is per unit or for the whole quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// Price of a single unit.
    Unit,
    /// Price of the full quantity.
    Total,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Unit => "unit",
            PriceType::Total => "total",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Product name, whitespace collapsed and punctuation trimmed.
    pub product_name: Option<String>,

    /// Quantity as written on the line.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub quantity: Option<Decimal>,

    /// Canonical unit token, or the lowercased raw token when unknown.
    pub unit: Option<String>,

    /// Price with currency markers and thousands separators removed.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,

    /// Meaning of `price`.
    pub price_type: Option<PriceType>,

    /// `price / quantity` when the price is a total.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub derived_unit_price: Option<Decimal>,

    /// Candidate line the item was parsed from, verbatim.
    pub raw_line: String,

    /// Completeness/specificity score (0.0 - 1.0).
    pub confidence: f64,
}

/// Derive a per-unit price from a total.
///
/// Returns `None` unless the price is a total and both price and a positive
/// quantity are known. The quotient is rounded to four decimal places.
pub fn derive_unit_price(
    price: Option<Decimal>,
    quantity: Option<Decimal>,
    price_type: Option<PriceType>,
) -> Option<Decimal> {
    if price_type != Some(PriceType::Total) {
        return None;
    }
    let (price, quantity) = (price?, quantity?);
    if quantity <= Decimal::ZERO {
        return None;
    }
    price
        .checked_div(quantity)
        .map(|unit_price| unit_price.round_dp(DERIVED_PRICE_SCALE).normalize())
}
