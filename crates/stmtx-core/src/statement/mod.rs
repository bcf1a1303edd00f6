//! Credit-card statement field extraction module.

mod parser;
pub mod rules;

pub use parser::{CascadeParser, ExtractionResult, StatementParser};

use crate::models::statement::FieldRecord;

/// Extract the six statement fields from text using default settings.
pub fn extract_fields(text: &str) -> FieldRecord {
    CascadeParser::new().parse(text).record
}
