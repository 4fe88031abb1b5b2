//! Configuration structures for the extraction pipeline.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ItemizeError, Result};

/// Per-input character ceiling applied when nothing else is configured.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 50_000;

/// Main configuration for itemize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemizeConfig {
    /// Line item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Line item extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Items scoring below this are dropped (0.0 - 1.0).
    pub min_confidence: f64,

    /// Maximum characters per input (0 = unlimited).
    pub max_input_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON response with request id.
    #[default]
    Json,
    /// One CSV row per item.
    Csv,
    /// Plain text table.
    Text,
}

impl OutputFormat {
    /// File extension used when writing this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Text => f.write_str("text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!("unknown output format: {other} (expected json, csv or text)")),
        }
    }
}

impl ItemizeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let min = self.extraction.min_confidence;
        if !(0.0..=1.0).contains(&min) {
            return Err(ItemizeError::Config(format!(
                "extraction.min_confidence must be within 0.0 and 1.0, got {min}"
            )));
        }
        Ok(())
    }

    /// Look up a value by dotted key (e.g. "extraction.min_confidence").
    pub fn get_path(&self, key: &str) -> Result<Value> {
        let json = serde_json::to_value(self)?;
        let mut current = &json;

        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| {
                    ItemizeError::Config(format!("configuration key not found: {key}"))
                })?;
        }

        Ok(current.clone())
    }

    /// Return a copy with the value at a dotted key replaced.
    ///
    /// `raw` is parsed as JSON when possible and taken as a string otherwise.
    /// Only existing keys can be set, and the result must still validate.
    pub fn set_path(&self, key: &str, raw: &str) -> Result<Self> {
        let parsed: Value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        let mut json = serde_json::to_value(self)?;
        let parts: Vec<&str> = key.split('.').collect();
        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| ItemizeError::Config("empty configuration key".to_string()))?;

        let mut current = &mut json;
        for part in parents {
            current = current
                .get_mut(*part)
                .ok_or_else(|| {
                    ItemizeError::Config(format!("configuration path not found: {key}"))
                })?;
        }

        let slot = current
            .as_object_mut()
            .and_then(|obj| obj.get_mut(*last))
            .ok_or_else(|| ItemizeError::Config(format!("configuration key not found: {key}")))?;
        *slot = parsed;

        let config: Self = serde_json::from_value(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ItemizeConfig::default();
        assert_eq!(config.extraction.min_confidence, 0.0);
        assert_eq!(config.extraction.max_input_chars, 50_000);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ItemizeConfig =
            serde_json::from_str(r#"{"extraction": {"min_confidence": 0.5}}"#).unwrap();
        assert_eq!(config.extraction.min_confidence, 0.5);
        assert_eq!(config.extraction.max_input_chars, DEFAULT_MAX_INPUT_CHARS);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_get_path() {
        let config = ItemizeConfig::default();
        assert_eq!(
            config.get_path("extraction.max_input_chars").unwrap(),
            serde_json::json!(50_000)
        );
        assert_eq!(config.get_path("output.format").unwrap(), serde_json::json!("json"));
        assert!(config.get_path("output.missing").is_err());
    }

    #[test]
    fn test_set_path() {
        let config = ItemizeConfig::default();

        let updated = config.set_path("output.format", "csv").unwrap();
        assert_eq!(updated.output.format, OutputFormat::Csv);

        let updated = updated.set_path("extraction.min_confidence", "0.75").unwrap();
        assert_eq!(updated.extraction.min_confidence, 0.75);

        assert!(config.set_path("extraction.min_confidence", "1.5").is_err());
        assert!(config.set_path("extraction.unknown", "1").is_err());
        assert!(config.set_path("output.pretty", "maybe").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = ItemizeConfig::default()
            .set_path("output.pretty", "true")
            .unwrap();
        config.save(&path).unwrap();

        let loaded = ItemizeConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
