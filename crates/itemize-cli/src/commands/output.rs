//! Response envelope and output rendering shared by parse and batch.

use anyhow::Context;
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use itemize_core::models::config::OutputFormat;
use itemize_core::models::item::ParsedLine;

/// CSV columns, one row per item.
const CSV_HEADERS: [&str; 9] = [
    "input_index",
    "product_name",
    "quantity",
    "unit",
    "price",
    "price_type",
    "derived_unit_price",
    "raw_line",
    "confidence",
];

/// Items extracted from one input.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub input_index: usize,
    pub items: Vec<ParsedLine>,
}

/// Items for every input plus a deterministic request id.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub request_id: String,
    pub results: Vec<ParseResult>,
}

impl ParseResponse {
    /// Build a response for text inputs.
    ///
    /// A single input is hashed as `content`, several as `contents`.
    pub fn from_inputs(inputs: &[String], results: Vec<ParseResult>) -> anyhow::Result<Self> {
        let (content, contents) = match inputs {
            [single] => (Some(single), None),
            many => (None, Some(many)),
        };
        let payload = json!({
            "content": content,
            "contents": contents,
            "results": results,
        });

        Ok(Self {
            request_id: stable_request_id(&payload)?,
            results,
        })
    }

    /// Build a response for a file, keyed by its name and content hash.
    pub fn from_file(
        filename: &str,
        content_sha256: &str,
        result: ParseResult,
    ) -> anyhow::Result<Self> {
        let results = vec![result];
        let payload = json!({
            "filename": filename,
            "content_sha256": content_sha256,
            "results": results,
        });

        Ok(Self {
            request_id: stable_request_id(&payload)?,
            results,
        })
    }

    /// Total number of items across inputs.
    pub fn item_count(&self) -> usize {
        self.results.iter().map(|r| r.items.len()).sum()
    }
}

/// Hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hash a JSON payload in compact form with sorted keys.
pub fn stable_request_id(payload: &Value) -> anyhow::Result<String> {
    // serde_json::Map is a BTreeMap, so keys serialize in sorted order
    let canonical = serde_json::to_string(payload).context("failed to serialize payload")?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Render a response in the requested format.
pub fn render(
    response: &ParseResponse,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Json => Ok(serde_json::to_string(response)?),
        OutputFormat::Csv => format_csv(response),
        OutputFormat::Text => Ok(format_text(response)),
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn format_csv(response: &ParseResponse) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADERS)?;

    for result in &response.results {
        for item in &result.items {
            wtr.write_record([
                result.input_index.to_string(),
                opt(&item.product_name),
                opt(&item.quantity),
                opt(&item.unit),
                opt(&item.price),
                opt(&item.price_type),
                opt(&item.derived_unit_price),
                item.raw_line.clone(),
                format!("{:.3}", item.confidence),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(response: &ParseResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!("Request: {}\n", response.request_id));

    for result in &response.results {
        output.push_str(&format!(
            "\nInput {} ({} items)\n",
            result.input_index,
            result.items.len()
        ));

        for item in &result.items {
            let name = item.product_name.as_deref().unwrap_or("?");
            let quantity = match (&item.quantity, &item.unit) {
                (Some(q), Some(u)) => format!("{} {}", q, u),
                (Some(q), None) => q.to_string(),
                (None, Some(u)) => u.clone(),
                (None, None) => "-".to_string(),
            };
            let price = match (&item.price, item.price_type) {
                (Some(p), Some(t)) => format!("{} ({})", p, t),
                (Some(p), None) => p.to_string(),
                (None, _) => "-".to_string(),
            };

            output.push_str(&format!("  {:<24} {:>12}  {:>18}", name, quantity, price));
            if let Some(unit_price) = &item.derived_unit_price {
                output.push_str(&format!("  = {} per unit", unit_price));
            }
            output.push_str(&format!("  [{:.2}]\n", item.confidence));
        }
    }

    output
}
