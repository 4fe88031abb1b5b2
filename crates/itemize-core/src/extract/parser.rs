//! Line item extraction engine.
//!
//! Text is segmented into candidate lines, noise is dropped, every catalog
//! shape is tried on what remains and the best-scoring match wins.

use std::cmp::Reverse;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, DEFAULT_MAX_INPUT_CHARS};
use crate::models::item::{derive_unit_price, ParsedLine};

use super::rules::{
    classify_noise, clean_price, maybe_number, normalize_name, normalize_unit,
    split_candidate_lines, FieldExtractor, FieldPresence, NoiseReason, PatternCatalog,
    PatternKind, PatternMatch, Score,
};
use super::Result;

/// A scored interpretation of one line by one catalog shape.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item: ParsedLine,
    pub kind: PatternKind,
    score: Score,
    populated: usize,
    precedence: usize,
}

impl Candidate {
    /// Normalize the captured fields of a match and score them.
    pub fn from_match(line: &str, m: &PatternMatch) -> Self {
        let product_name = normalize_name(m.name.as_deref());
        let quantity = maybe_number(m.qty.as_deref());
        let unit = normalize_unit(m.unit_token());
        let price = clean_price(m.price.as_deref());
        let price_type = Some(m.kind.price_type(quantity));
        let derived_unit_price = derive_unit_price(price, quantity, price_type);

        let presence = FieldPresence {
            name: product_name.is_some(),
            quantity: quantity.is_some(),
            unit: unit.as_deref().is_some_and(|u| !u.is_empty()),
            price: price.is_some(),
            price_type: price_type.is_some(),
        };
        let score = Score::compute(presence, m.kind.is_explicit());

        Self {
            item: ParsedLine {
                product_name,
                quantity,
                unit,
                price,
                price_type,
                derived_unit_price,
                raw_line: line.to_string(),
                confidence: score.as_f64(),
            },
            kind: m.kind,
            score,
            populated: presence.count(),
            precedence: m.precedence,
        }
    }

    /// Ordering key: score, then populated fields, then earlier catalog position.
    fn rank(&self) -> (Score, usize, Reverse<usize>) {
        (self.score, self.populated, Reverse(self.precedence))
    }
}

/// What happened to a single candidate line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Dropped as administrative or metadata text.
    Noise(NoiseReason),
    /// No catalog shape matched.
    Unmatched,
    /// Resolved to an item.
    Item(ParsedLine),
}

/// Pick the winning candidate among competing matches.
pub fn select_winner(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().max_by_key(Candidate::rank)
}

/// Classify and resolve one candidate line.
pub fn resolve_line(line: &str) -> LineOutcome {
    if let Some(reason) = classify_noise(line) {
        trace!("noise ({:?}): {}", reason, line);
        return LineOutcome::Noise(reason);
    }

    let candidates: Vec<Candidate> = PatternCatalog::new()
        .extract_all(line)
        .iter()
        .map(|m| Candidate::from_match(line, m))
        .collect();

    let considered = candidates.len();
    match select_winner(candidates) {
        Some(winner) => {
            debug!(
                "{} of {} shapes matched, {} won with confidence {:.2}: {}",
                considered,
                PatternKind::ALL.len(),
                winner.kind,
                winner.item.confidence,
                line
            );
            LineOutcome::Item(winner.item)
        }
        None => {
            trace!("no shape matched: {}", line);
            LineOutcome::Unmatched
        }
    }
}

/// Parse one candidate line into an item, or `None` for noise and unmatched lines.
pub fn extract_from_line(line: &str) -> Option<ParsedLine> {
    match resolve_line(line) {
        LineOutcome::Item(item) => Some(item),
        LineOutcome::Noise(_) | LineOutcome::Unmatched => None,
    }
}

/// Run the full pipeline on a text blob, returning items in line order.
pub fn extract_items(text: &str) -> Vec<ParsedLine> {
    split_candidate_lines(text)
        .iter()
        .filter_map(|line| extract_from_line(line))
        .collect()
}

/// Counters describing one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines produced by segmentation.
    pub candidate_lines: usize,
    /// Lines dropped as noise.
    pub noise_lines: usize,
    /// Lines no shape matched.
    pub unmatched_lines: usize,
    /// Items dropped by the confidence floor.
    pub below_threshold: usize,
    /// Items returned.
    pub extracted: usize,
}

impl AddAssign for ExtractionStats {
    fn add_assign(&mut self, other: Self) {
        self.candidate_lines += other.candidate_lines;
        self.noise_lines += other.noise_lines;
        self.unmatched_lines += other.unmatched_lines;
        self.below_threshold += other.below_threshold;
        self.extracted += other.extracted;
    }
}

/// Result of a checked parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted items in line order.
    pub items: Vec<ParsedLine>,
    /// Segmentation and resolution counters.
    pub stats: ExtractionStats,
}

impl ExtractionResult {
    /// Mean confidence of the returned items.
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        let sum: f64 = self.items.iter().map(|i| i.confidence).sum();
        Some(sum / self.items.len() as f64)
    }
}

/// Trait for text-to-items parsers.
pub trait ItemParser {
    /// Parse items from a text blob.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Configurable front end over [`extract_items`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemParser {
    /// Items scoring below this are dropped.
    min_confidence: f64,
    /// Maximum input length in characters (0 = unlimited).
    max_input_chars: usize,
}

impl LineItemParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            min_confidence: 0.0,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_min_confidence(config.min_confidence)
            .with_max_input_chars(config.max_input_chars)
    }

    /// Set minimum confidence threshold.
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Set the input ceiling (0 disables it).
    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    fn check(&self, text: &str) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ExtractionError::InvalidConfig {
                field: "min_confidence".to_string(),
                reason: format!("{} is outside 0.0 - 1.0", self.min_confidence),
            });
        }

        if self.max_input_chars > 0 {
            let chars = text.chars().count();
            if chars > self.max_input_chars {
                return Err(ExtractionError::InputTooLarge {
                    chars,
                    max: self.max_input_chars,
                });
            }
        }

        Ok(())
    }
}

impl Default for LineItemParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemParser for LineItemParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        self.check(text)?;

        let lines = split_candidate_lines(text);
        let mut stats = ExtractionStats {
            candidate_lines: lines.len(),
            ..Default::default()
        };
        let mut items = Vec::new();

        for line in &lines {
            match resolve_line(line) {
                LineOutcome::Noise(_) => stats.noise_lines += 1,
                LineOutcome::Unmatched => stats.unmatched_lines += 1,
                LineOutcome::Item(item) if item.confidence < self.min_confidence => {
                    trace!(
                        "below threshold ({:.2} < {:.2}): {}",
                        item.confidence,
                        self.min_confidence,
                        line
                    );
                    stats.below_threshold += 1;
                }
                LineOutcome::Item(item) => items.push(item),
            }
        }
        stats.extracted = items.len();

        debug!(
            "extracted {} items from {} candidate lines ({} noise, {} unmatched, {} below threshold)",
            stats.extracted,
            stats.candidate_lines,
            stats.noise_lines,
            stats.unmatched_lines,
            stats.below_threshold
        );

        Ok(ExtractionResult { items, stats })
    }
}
