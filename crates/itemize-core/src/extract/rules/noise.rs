//! Noise classification for administrative and metadata lines.

use regex::Regex;

use super::patterns::{ADDRESS_LABEL, BARE_DATE, INVOICE_HEADER, TAX_ID, TOTAL_LINE};

/// Lines shorter than this (in characters, after trimming) are noise.
pub const MIN_LINE_CHARS: usize = 3;

/// Why a line was classified as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseReason {
    /// Fewer than three characters.
    TooShort,
    /// No alphabetic character.
    NoLetters,
    /// Invoice number header.
    InvoiceHeader,
    /// Tax identifier (NTN, STRN, VAT, GST...).
    TaxIdentifier,
    /// Total amount line.
    TotalLine,
    /// Address label.
    Address,
    /// Bare date.
    Date,
}

impl NoiseReason {
    fn markers() -> [(&'static Regex, NoiseReason); 5] {
        [
            (&*INVOICE_HEADER, NoiseReason::InvoiceHeader),
            (&*TAX_ID, NoiseReason::TaxIdentifier),
            (&*TOTAL_LINE, NoiseReason::TotalLine),
            (&*ADDRESS_LABEL, NoiseReason::Address),
            (&*BARE_DATE, NoiseReason::Date),
        ]
    }
}

/// Classify a candidate line, returning the first noise rule it trips.
pub fn classify_noise(line: &str) -> Option<NoiseReason> {
    let lowered = line.to_lowercase();
    let lowered = lowered.trim();

    if lowered.chars().count() < MIN_LINE_CHARS {
        return Some(NoiseReason::TooShort);
    }
    if !lowered.chars().any(char::is_alphabetic) {
        return Some(NoiseReason::NoLetters);
    }

    NoiseReason::markers()
        .into_iter()
        .find(|(marker, _)| marker.is_match(lowered))
        .map(|(_, reason)| reason)
}

/// Return true when a line looks like metadata instead of a product line.
pub fn is_noise_line(line: &str) -> bool {
    classify_noise(line).is_some()
}
