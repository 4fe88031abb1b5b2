//! Ordered catalog of line shapes.

use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_decimal::Decimal;

use crate::models::item::PriceType;

use super::patterns::{
    DASH_PRICE_PAREN_QTY, FALLBACK_NAME_PRICE, NAME_QTY_UNIT_PRICE, PAREN_QTY_AT_PRICE,
    QTY_PRICE_SLASH_UNIT,
};
use super::FieldExtractor;

/// Identifier of a line shape, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `<name> qty <qty> <unit>? ... price <price>/<unit>`
    QtyPriceSlashUnit,
    /// `<name> (<qty> <unit> @ <price>)`
    ParenQtyAtPrice,
    /// `<name> - <price> (<qty> <unit>)`
    DashPriceParenQty,
    /// `<name> <qty> <unit> ... <price>`
    NameQtyUnitPrice,
    /// `<name> - <price>`
    FallbackNamePrice,
}

impl PatternKind {
    /// All kinds in precedence order.
    pub const ALL: [PatternKind; 5] = [
        PatternKind::QtyPriceSlashUnit,
        PatternKind::ParenQtyAtPrice,
        PatternKind::DashPriceParenQty,
        PatternKind::NameQtyUnitPrice,
        PatternKind::FallbackNamePrice,
    ];

    /// Stable name used in logs and scoring.
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::QtyPriceSlashUnit => "qty_price_slash_unit",
            PatternKind::ParenQtyAtPrice => "paren_qty_at_price",
            PatternKind::DashPriceParenQty => "dash_price_paren_qty",
            PatternKind::NameQtyUnitPrice => "name_qty_unit_price",
            PatternKind::FallbackNamePrice => "fallback_name_price",
        }
    }

    /// Shapes explicit enough to earn the confidence bonus.
    pub fn is_explicit(&self) -> bool {
        matches!(
            self,
            PatternKind::QtyPriceSlashUnit
                | PatternKind::ParenQtyAtPrice
                | PatternKind::DashPriceParenQty
        )
    }

    /// Price semantics implied by this shape for the captured quantity.
    pub fn price_type(&self, quantity: Option<Decimal>) -> PriceType {
        match self {
            PatternKind::QtyPriceSlashUnit | PatternKind::ParenQtyAtPrice => PriceType::Unit,
            PatternKind::DashPriceParenQty | PatternKind::FallbackNamePrice => PriceType::Total,
            PatternKind::NameQtyUnitPrice => match quantity {
                Some(qty) if qty > Decimal::ONE => PriceType::Total,
                _ => PriceType::Unit,
            },
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            PatternKind::QtyPriceSlashUnit => &QTY_PRICE_SLASH_UNIT,
            PatternKind::ParenQtyAtPrice => &PAREN_QTY_AT_PRICE,
            PatternKind::DashPriceParenQty => &DASH_PRICE_PAREN_QTY,
            PatternKind::NameQtyUnitPrice => &NAME_QTY_UNIT_PRICE,
            PatternKind::FallbackNamePrice => &FALLBACK_NAME_PRICE,
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A catalog entry: a named shape and its position in the precedence order.
#[derive(Debug, Clone)]
pub struct PatternDefinition {
    pub kind: PatternKind,
    pub precedence: usize,
    regex: &'static Regex,
}

impl PatternDefinition {
    /// Match the whole line against this shape.
    pub fn matches(&self, line: &str) -> Option<PatternMatch> {
        self.regex
            .captures(line)
            .map(|caps| PatternMatch::from_captures(self, &caps))
    }
}

/// Raw substrings captured by one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub precedence: usize,
    pub name: Option<String>,
    pub qty: Option<String>,
    pub unit: Option<String>,
    pub price_unit: Option<String>,
    pub price: Option<String>,
}

impl PatternMatch {
    fn from_captures(definition: &PatternDefinition, caps: &Captures<'_>) -> Self {
        let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        Self {
            kind: definition.kind,
            precedence: definition.precedence,
            name: group("name"),
            qty: group("qty"),
            unit: group("unit"),
            price_unit: group("price_unit"),
            price: group("price"),
        }
    }

    /// The unit token, falling back to the unit written after the price slash.
    pub fn unit_token(&self) -> Option<&str> {
        self.unit
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.price_unit.as_deref())
    }
}

lazy_static! {
    /// Line shapes in precedence order, most specific first.
    pub static ref CATALOG: Vec<PatternDefinition> = PatternKind::ALL
        .iter()
        .enumerate()
        .map(|(precedence, kind)| PatternDefinition {
            kind: *kind,
            precedence,
            regex: kind.regex(),
        })
        .collect();
}

/// Runs every catalog entry against a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternCatalog;

impl PatternCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn definitions(&self) -> &'static [PatternDefinition] {
        &CATALOG
    }
}

impl FieldExtractor for PatternCatalog {
    type Output = PatternMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.definitions().iter().find_map(|def| def.matches(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.definitions()
            .iter()
            .filter_map(|def| def.matches(text))
            .collect()
    }
}
