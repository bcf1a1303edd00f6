//! Cardholder name extraction.

use super::cascade::{group, Cascade};
use super::patterns::{CARDHOLDER_NAME_RULES, CORPORATE_SUFFIX, NAME_LINE};
use super::{truncate_chars, ExtractionMatch, FieldExtractor, Provenance, Tier};
use crate::models::statement::{Field, Issuer};

const LEADING_LINE_RULE: &str = "leading name line";

/// Cardholder name field extractor.
pub struct CardholderNameExtractor {
    max_length: usize,
    scan_lines: usize,
}

impl CardholderNameExtractor {
    /// Create an extractor with a 50 character cap scanning 15 lines.
    pub fn new() -> Self {
        Self {
            max_length: 50,
            scan_lines: 15,
        }
    }

    /// Set the maximum name length in characters.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set how many leading lines the unlabeled fallback scans.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }

    fn clean(&self, raw: &str) -> Option<String> {
        let stripped = CORPORATE_SUFFIX.replace(raw.trim(), "");
        let name = truncate_chars(&stripped, self.max_length).trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// First of the leading lines that reads like "First Last".
    fn leading_line(&self, text: &str) -> Option<ExtractionMatch<String>> {
        text.trim()
            .lines()
            .take(self.scan_lines)
            .map(str::trim)
            .find(|line| NAME_LINE.is_match(line) && line.chars().count() < self.max_length)
            .map(|line| {
                ExtractionMatch::new(
                    line.to_string(),
                    Provenance::new(Tier::Fallback, LEADING_LINE_RULE),
                    line,
                )
            })
    }
}

impl Default for CardholderNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CardholderNameExtractor {
    type Output = String;

    fn field(&self) -> Field {
        Field::CardholderName
    }

    fn extract(&self, text: &str, issuer: Option<Issuer>) -> Option<ExtractionMatch<String>> {
        Cascade::for_field(Field::CardholderName, issuer, CARDHOLDER_NAME_RULES.as_slice(), &[])
            .run(text, |caps| group(caps, 1).and_then(|raw| self.clean(raw)))
            .or_else(|| self.leading_line(text))
    }
}
