//! Rule-based building blocks of the extraction pipeline.

pub mod catalog;
pub mod noise;
pub mod normalize;
pub mod patterns;
pub mod scoring;
pub mod segment;

pub use catalog::{PatternCatalog, PatternDefinition, PatternKind, PatternMatch, CATALOG};
pub use noise::{classify_noise, is_noise_line, NoiseReason};
pub use normalize::{clean_price, maybe_number, normalize_name, normalize_unit, UNIT_SYNONYMS};
pub use scoring::{compute_confidence, FieldPresence, Score};
pub use segment::split_candidate_lines;

/// Trait for rule-based extractors working on a single line of text.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first match from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all matches, in rule order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
