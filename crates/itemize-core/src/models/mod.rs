//! Data models for extracted line items and configuration.

pub mod config;
pub mod item;

pub use config::{ExtractionConfig, ItemizeConfig, OutputConfig, OutputFormat};
pub use item::{derive_unit_price, ParsedLine, PriceType};
