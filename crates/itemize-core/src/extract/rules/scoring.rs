//! Confidence scoring for candidate matches.
//!
//! Weights are kept in hundredths so the score is exact and ties compare
//! reliably.

const NAME_WEIGHT: u32 = 35;
const QUANTITY_WEIGHT: u32 = 20;
const UNIT_WEIGHT: u32 = 10;
const PRICE_WEIGHT: u32 = 25;
const PRICE_TYPE_WEIGHT: u32 = 10;
const EXPLICIT_SHAPE_BONUS: u32 = 5;
const MAX_SCORE: u32 = 100;

/// Which fields a candidate populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPresence {
    pub name: bool,
    pub quantity: bool,
    pub unit: bool,
    pub price: bool,
    pub price_type: bool,
}

impl FieldPresence {
    /// Number of populated fields.
    pub fn count(&self) -> usize {
        [self.name, self.quantity, self.unit, self.price, self.price_type]
            .into_iter()
            .filter(|present| *present)
            .count()
    }
}

/// A confidence score in hundredths (0 - 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    /// Score a candidate from its populated fields and pattern specificity.
    pub fn compute(fields: FieldPresence, explicit_shape: bool) -> Self {
        let weighted = [
            (fields.name, NAME_WEIGHT),
            (fields.quantity, QUANTITY_WEIGHT),
            (fields.unit, UNIT_WEIGHT),
            (fields.price, PRICE_WEIGHT),
            (fields.price_type, PRICE_TYPE_WEIGHT),
            (explicit_shape, EXPLICIT_SHAPE_BONUS),
        ];
        let total: u32 = weighted
            .into_iter()
            .filter(|(present, _)| *present)
            .map(|(_, weight)| weight)
            .sum();
        Score(total.min(MAX_SCORE))
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    /// Score as a fraction in [0.0, 1.0].
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / MAX_SCORE as f64
    }
}

/// Compute the confidence of a candidate as a fraction in [0.0, 1.0].
pub fn compute_confidence(fields: FieldPresence, explicit_shape: bool) -> f64 {
    Score::compute(fields, explicit_shape).as_f64()
}
