//! Line item extraction module.

mod parser;
pub mod rules;

pub use parser::{
    extract_from_line, extract_items, resolve_line, select_winner, Candidate, ExtractionResult,
    ExtractionStats, ItemParser, LineItemParser, LineOutcome,
};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
