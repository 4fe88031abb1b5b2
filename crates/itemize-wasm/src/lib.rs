//! WASM bindings for invoice line item extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use itemize_core::extract::rules;
use itemize_core::{extract_items, ItemParser, LineItemParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract line items from free-form text.
///
/// Returns an array of parsed lines. No input size limit is applied.
#[wasm_bindgen]
pub fn extract_items_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&extract_items(text))
}

/// Parse a price token (e.g., "Rs. 1,250.50").
#[wasm_bindgen]
pub fn clean_price(raw: &str) -> Option<f64> {
    rules::clean_price(Some(raw)).and_then(|d| d.to_f64())
}

/// Map a unit token to its canonical form (e.g., "Kgs" to "kg").
#[wasm_bindgen]
pub fn normalize_unit(raw: &str) -> Option<String> {
    rules::normalize_unit(Some(raw))
}

/// Whether a line is boilerplate that never yields an item.
#[wasm_bindgen]
pub fn is_noise_line(line: &str) -> bool {
    rules::is_noise_line(line)
}

/// Line item extractor class for browser use.
#[wasm_bindgen]
pub struct LineItemExtractor {
    parser: LineItemParser,
}

#[wasm_bindgen]
impl LineItemExtractor {
    /// Create a new extractor with default limits.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: LineItemParser::new(),
        }
    }

    /// Drop items scoring below `confidence` (0.0 - 1.0).
    #[wasm_bindgen]
    pub fn set_min_confidence(&mut self, confidence: f64) -> Result<(), JsValue> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(JsValue::from_str(&format!(
                "min_confidence must be within 0.0 and 1.0, got {confidence}"
            )));
        }
        self.parser = self.parser.clone().with_min_confidence(confidence);
        Ok(())
    }

    /// Extract items from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self
            .parser
            .parse(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        to_js(&result.items)
    }

    /// Extract items along with parse counters.
    #[wasm_bindgen]
    pub fn extract_with_stats(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self
            .parser
            .parse(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        #[derive(Serialize)]
        struct ExtractOutput {
            items: Vec<itemize_core::ParsedLine>,
            stats: itemize_core::ExtractionStats,
            mean_confidence: Option<f64>,
        }

        let output = ExtractOutput {
            mean_confidence: result.mean_confidence(),
            items: result.items,
            stats: result.stats,
        };

        to_js(&output)
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn from_js(value: JsValue) -> Value {
        serde_wasm_bindgen::from_value(value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_clean_price() {
        assert_eq!(clean_price("Rs. 1,250.50"), Some(1250.5));
        assert_eq!(clean_price("free"), None);
    }

    #[wasm_bindgen_test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("Kgs").as_deref(), Some("kg"));
        assert_eq!(normalize_unit("crate").as_deref(), Some("crate"));
    }

    #[wasm_bindgen_test]
    fn test_is_noise_line() {
        assert!(is_noise_line("Invoice No 42"));
        assert!(!is_noise_line("Salt - 80"));
    }

    #[wasm_bindgen_test]
    fn test_extract_items_from_text() {
        let items = from_js(extract_items_from_text("Sugar – Rs. 6,000 (50 kg)").unwrap());
        assert_eq!(items[0]["product_name"], "Sugar");
        assert_eq!(items[0]["derived_unit_price"].as_f64(), Some(120.0));
    }

    #[wasm_bindgen_test]
    fn test_confidence_keeps_two_decimals() {
        let items = from_js(extract_items_from_text("Salt - 80").unwrap());
        assert_eq!(items[0]["confidence"].as_f64(), Some(0.7));
    }

    #[wasm_bindgen_test]
    fn test_extractor_threshold() {
        let mut extractor = LineItemExtractor::new();
        assert!(extractor.set_min_confidence(1.5).is_err());
        extractor.set_min_confidence(0.9).unwrap();

        let output = from_js(
            extractor
                .extract_with_stats("Sugar – Rs. 6,000 (50 kg)\nSalt - 80")
                .unwrap(),
        );
        assert_eq!(output["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(output["stats"]["below_threshold"].as_f64(), Some(1.0));
    }
}
