//! Normalization of captured substrings into typed values.
//!
//! Every function here is total: empty or unparseable input yields `None`.

use std::collections::HashMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use rust_decimal::Decimal;

use super::patterns::{CURRENCY_MARKER, DECIMAL_DIGIT, WHITESPACE_RUN};

lazy_static! {
    /// Unit synonyms mapped to their canonical token.
    pub static ref UNIT_SYNONYMS: HashMap<&'static str, &'static str> = [
        ("kg", "kg"),
        ("kgs", "kg"),
        ("kilogram", "kg"),
        ("kilograms", "kg"),
        ("g", "g"),
        ("gram", "g"),
        ("grams", "g"),
        ("pc", "pcs"),
        ("pcs", "pcs"),
        ("piece", "pcs"),
        ("pieces", "pcs"),
        ("bottle", "bottles"),
        ("bottles", "bottles"),
        ("l", "l"),
        ("ltr", "l"),
        ("liter", "l"),
        ("liters", "l"),
        ("ml", "ml"),
        ("pack", "packs"),
        ("packs", "packs"),
        ("box", "boxes"),
        ("boxes", "boxes"),
    ]
    .into_iter()
    .collect();
}

/// Characters trimmed from both ends of a product name.
const NAME_TRIM: &[char] = &[' ', '-', ':', ',', '.', '\t'];

/// Parse a price such as "Rs. 6,000" or "$1,200.50".
///
/// Currency markers (`rs`, `rs.`, `pkr`, `usd`, `$`) and commas are removed
/// before parsing.
pub fn clean_price(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let stripped = CURRENCY_MARKER.replace_all(raw, "");
    let cleaned = stripped.replace(',', "");
    parse_decimal(cleaned.trim())
}

/// Map a raw unit token to its canonical form (`kgs` -> `kg`).
///
/// Tokens outside the synonym table pass through lowercased.
pub fn normalize_unit(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let lowered = raw.trim().to_lowercase();
    match UNIT_SYNONYMS.get(lowered.as_str()) {
        Some(canonical) => Some((*canonical).to_string()),
        None => Some(lowered),
    }
}

/// Collapse whitespace and trim punctuation from a product name.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    let trimmed = collapsed.trim_matches(NAME_TRIM);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a bare decimal number such as "5" or "2.5".
pub fn maybe_number(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw.filter(|s| !s.is_empty())?;
    parse_decimal(raw.trim())
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let ascii: String = s.chars().map(ascii_digit).collect();
    // A lone sign or separator is not a number
    if !ascii.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&ascii).ok()
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Fold a Unicode decimal digit to its ASCII form; other characters pass through.
///
/// Decimal digits are encoded in contiguous runs of complete 0-9 blocks, so a
/// digit's value is its offset from the start of its run, modulo 10.
fn ascii_digit(c: char) -> char {
    if c.is_ascii() || !is_decimal_digit(c) {
        return c;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    char::from_digit((c as u32 - start) % 10, 10).unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_clean_price() {
        assert_eq!(clean_price(Some("Rs. 6,000")), Some(dec("6000")));
        assert_eq!(clean_price(Some("rs 950")), Some(dec("950")));
        assert_eq!(clean_price(Some("PKR 1,250.50")), Some(dec("1250.50")));
        assert_eq!(clean_price(Some("$12.99")), Some(dec("12.99")));
        assert_eq!(clean_price(Some("USD 40")), Some(dec("40")));
        assert_eq!(clean_price(Some("1200")), Some(dec("1200")));
    }

    #[test]
    fn test_clean_price_invalid() {
        assert_eq!(clean_price(None), None);
        assert_eq!(clean_price(Some("")), None);
        assert_eq!(clean_price(Some("Rs.")), None);
        assert_eq!(clean_price(Some("12..5")), None);
        assert_eq!(clean_price(Some("free")), None);
    }

    #[test]
    fn test_clean_price_unicode_digits() {
        // Arabic-Indic, Devanagari and fullwidth digits
        assert_eq!(clean_price(Some("٣٠٠")), Some(dec("300")));
        assert_eq!(clean_price(Some("Rs. ४,५००")), Some(dec("4500")));
        assert_eq!(clean_price(Some("１２.５")), Some(dec("12.5")));
        assert_eq!(maybe_number(Some("٢")), Some(dec("2")));
        // Mathematical digits sit in back-to-back blocks
        assert_eq!(maybe_number(Some("\u{1D7D9}\u{1D7CE}")), Some(dec("10")));
    }

    #[test]
    fn test_large_prices_within_decimal_range() {
        assert_eq!(
            clean_price(Some("12,345,678,901,234,567,890,123,456")),
            Some(dec("12345678901234567890123456"))
        );
        // Decimal tops out near 7.9e28; longer digit runs degrade to None
        assert_eq!(clean_price(Some("123456789012345678901234567890")), None);
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit(Some("KGS")), Some("kg".to_string()));
        assert_eq!(normalize_unit(Some("kilograms")), Some("kg".to_string()));
        assert_eq!(normalize_unit(Some("Grams")), Some("g".to_string()));
        assert_eq!(normalize_unit(Some("piece")), Some("pcs".to_string()));
        assert_eq!(normalize_unit(Some("bottle")), Some("bottles".to_string()));
        assert_eq!(normalize_unit(Some("Ltr")), Some("l".to_string()));
        assert_eq!(normalize_unit(Some("ml")), Some("ml".to_string()));
        assert_eq!(normalize_unit(Some("pack")), Some("packs".to_string()));
        assert_eq!(normalize_unit(Some("box")), Some("boxes".to_string()));
    }

    #[test]
    fn test_normalize_unit_passthrough() {
        assert_eq!(normalize_unit(Some("Dozen")), Some("dozen".to_string()));
        assert_eq!(normalize_unit(Some(" Tins ")), Some("tins".to_string()));
        assert_eq!(normalize_unit(None), None);
        assert_eq!(normalize_unit(Some("")), None);
    }

    #[test]
    fn test_unit_table_size() {
        assert_eq!(UNIT_SYNONYMS.len(), 22);
        assert!(UNIT_SYNONYMS
            .values()
            .all(|canonical| UNIT_SYNONYMS.get(canonical) == Some(canonical)));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("Wheat   Flour ")), Some("Wheat Flour".to_string()));
        assert_eq!(normalize_name(Some("- Sugar:")), Some("Sugar".to_string()));
        assert_eq!(normalize_name(Some("Salt\t\tfine.")), Some("Salt fine".to_string()));
        assert_eq!(normalize_name(Some("Milk & Honey")), Some("Milk & Honey".to_string()));
        assert_eq!(normalize_name(Some(" -.,: ")), None);
        assert_eq!(normalize_name(None), None);
    }

    #[test]
    fn test_maybe_number() {
        assert_eq!(maybe_number(Some("5")), Some(dec("5")));
        assert_eq!(maybe_number(Some("2.5")), Some(dec("2.5")));
        assert_eq!(maybe_number(Some(" 10 ")), Some(dec("10")));
        assert_eq!(maybe_number(Some("abc")), None);
        assert_eq!(maybe_number(Some("")), None);
        assert_eq!(maybe_number(None), None);
    }
}
