//! Regex patterns for line item matching and noise detection.
//!
//! Line shapes are anchored to the whole line and case-insensitive. Every
//! shape captures a subset of `name`, `qty`, `unit`, `price_unit` and `price`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Cooking Oil: Qty 5 bottles Price 1200/bottle"
    pub static ref QTY_PRICE_SLASH_UNIT: Regex = Regex::new(
        r"(?ix)
        ^\s*(?P<name>[A-Za-z][A-Za-z0-9\s\-\./&]+?)\s*[:\-]?\s*
        (?:qty|quantity)\s*(?P<qty>\d+(?:\.\d+)?)\s*(?P<unit>[A-Za-z]+)?
        .*?
        (?:price\s*)?(?P<price>(?:rs\.?|pkr|\$)?\s*[\d,]+(?:\.\d+)?)\s*/\s*(?P<price_unit>[A-Za-z]+)
        \s*$"
    ).unwrap();

    // "Wheat Flour (10kg @ 950)"
    pub static ref PAREN_QTY_AT_PRICE: Regex = Regex::new(
        r"(?ix)
        ^\s*(?P<name>[A-Za-z][A-Za-z0-9\s\-\./&]+?)\s*\(
        \s*(?P<qty>\d+(?:\.\d+)?)\s*(?P<unit>[A-Za-z]+)\s*@\s*(?P<price>(?:rs\.?|pkr|\$)?\s*[\d,]+(?:\.\d+)?)
        \s*\)\s*$"
    ).unwrap();

    // "Sugar – Rs. 6,000 (50 kg)"
    pub static ref DASH_PRICE_PAREN_QTY: Regex = Regex::new(
        r"(?ix)
        ^\s*(?P<name>[A-Za-z][A-Za-z0-9\s\-\./&]+?)\s*[\-–:]\s*
        (?P<price>(?:rs\.?|pkr|\$)?\s*[\d,]+(?:\.\d+)?)
        \s*\(\s*(?P<qty>\d+(?:\.\d+)?)\s*(?P<unit>[A-Za-z]+)\s*\)\s*$"
    ).unwrap();

    // "Tomatoes 5 kg 500"
    pub static ref NAME_QTY_UNIT_PRICE: Regex = Regex::new(
        r"(?ix)
        ^\s*(?P<name>[A-Za-z][A-Za-z0-9\s\-\./&]+?)\s+
        (?P<qty>\d+(?:\.\d+)?)\s*(?P<unit>[A-Za-z]+)
        .*?(?P<price>(?:rs\.?|pkr|\$)?\s*[\d,]+(?:\.\d+)?)\s*$"
    ).unwrap();

    // "Salt - 80"
    pub static ref FALLBACK_NAME_PRICE: Regex = Regex::new(
        r"(?ix)
        ^\s*(?P<name>[A-Za-z][A-Za-z0-9\s\-\./&]+?)\s*[\-–:]\s*
        (?P<price>(?:rs\.?|pkr|\$)?\s*[\d,]+(?:\.\d+)?)\s*$"
    ).unwrap();

    // Noise markers, searched anywhere in the lowercased line
    pub static ref INVOICE_HEADER: Regex = Regex::new(
        r"(?i)\binvoice\s*(no|#|number)?\b"
    ).unwrap();

    pub static ref TAX_ID: Regex = Regex::new(
        r"(?i)\b(ntn|strn|tax|vat|gst)\b"
    ).unwrap();

    pub static ref TOTAL_LINE: Regex = Regex::new(
        r"(?i)\btotal\s*(amount|due|tax)?\b"
    ).unwrap();

    pub static ref ADDRESS_LABEL: Regex = Regex::new(
        r"(?i)\baddress\b"
    ).unwrap();

    pub static ref BARE_DATE: Regex = Regex::new(
        r"^\s*\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\s*$"
    ).unwrap();

    // Currency markers stripped from prices
    pub static ref CURRENCY_MARKER: Regex = Regex::new(
        r"(?i)(rs\.?|pkr|usd|\$)"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Unicode decimal digit (general category Nd), same class as `\d` above
    pub static ref DECIMAL_DIGIT: Regex = Regex::new(
        r"\d"
    ).unwrap();
}
