//! Core library for turning free-form invoice and receipt text into line items.
//!
//! This crate provides:
//! - Segmentation of raw text into candidate item lines
//! - Noise filtering of headers, tax identifiers, totals and addresses
//! - An ordered catalog of line shapes with confidence-based conflict resolution
//! - Normalization of names, units, quantities and prices
//!
//! ```
//! let items = itemize_core::extract_items("Sugar – Rs. 6,000 (50 kg)");
//! assert_eq!(items[0].product_name.as_deref(), Some("Sugar"));
//! ```

pub mod error;
pub mod extract;
pub mod models;

pub use error::{ExtractionError, ItemizeError, Result};
pub use extract::{
    extract_from_line, extract_items, ExtractionResult, ExtractionStats, ItemParser,
    LineItemParser,
};
pub use models::config::{ItemizeConfig, OutputFormat};
pub use models::item::{ParsedLine, PriceType};
