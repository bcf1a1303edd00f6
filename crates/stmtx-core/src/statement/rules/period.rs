//! Statement period extraction.
//!
//! Labeled periods keep the captured text verbatim; the fallbacks rebuild a
//! `"<start> to <end>"` string from a range.

use super::cascade::{group, Cascade};
use super::patterns::{STATEMENT_PERIOD_FALLBACK_RULES, STATEMENT_PERIOD_RULES};
use super::{truncate_chars, ExtractionMatch, FieldExtractor};
use crate::models::statement::{Field, Issuer};

/// Statement period field extractor.
pub struct StatementPeriodExtractor {
    max_length: usize,
}

impl StatementPeriodExtractor {
    /// Create an extractor with a 100 character cap.
    pub fn new() -> Self {
        Self { max_length: 100 }
    }

    /// Set the maximum period length in characters.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

impl Default for StatementPeriodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StatementPeriodExtractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::StatementPeriod
    }

    fn extract(&self, text: &str, issuer: Option<Issuer>) -> Option<ExtractionMatch<String>> {
        Cascade::for_field(
            Field::StatementPeriod,
            issuer,
            STATEMENT_PERIOD_RULES.as_slice(),
            STATEMENT_PERIOD_FALLBACK_RULES.as_slice(),
        )
        .run(text, |caps| {
            let period = match (group(caps, 1), group(caps, 2)) {
                (Some(start), Some(end)) => format!("{} to {}", start, end.trim_end_matches(',')),
                (Some(label_text), None) => label_text.to_string(),
                _ => return None,
            };
            Some(truncate_chars(&period, self.max_length).trim_end().to_string())
        })
    }
}
