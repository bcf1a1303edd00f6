//! Rule-based field extractors for credit-card statements.

pub mod amounts;
pub mod card;
pub mod cascade;
pub mod dates;
pub mod issuer;
pub mod name;
pub mod overrides;
pub mod patterns;
pub mod period;

pub use amounts::{parse_amount, BalanceExtractor};
pub use card::CardLast4Extractor;
pub use cascade::{Cascade, Rule};
pub use dates::{normalize_date, DateNormalizer, DueDateExtractor};
pub use issuer::{detect_issuer, detect_issuer_match};
pub use name::CardholderNameExtractor;
pub use overrides::{override_rules, profile, IssuerProfile, Precedence};
pub use period::StatementPeriodExtractor;

use serde::Serialize;

use crate::models::statement::{Field, Issuer};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// The record field this extractor populates.
    fn field(&self) -> Field;

    /// Extract the field from text, applying the overrides of `issuer`.
    fn extract(&self, text: &str, issuer: Option<Issuer>) -> Option<ExtractionMatch<Self::Output>>;
}

/// Cascade tier that produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Generic labeled rules.
    Generic,
    /// Issuer-specific rules.
    Override,
    /// Generic last-resort rules.
    Fallback,
}

/// Which rule produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub tier: Tier,
    pub rule: &'static str,
}

impl Provenance {
    pub fn new(tier: Tier, rule: &'static str) -> Self {
        Self { tier, rule }
    }
}

/// An extracted value with its origin.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Tier and rule that produced the value.
    pub provenance: Provenance,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, provenance: Provenance, source: impl Into<String>) -> Self {
        Self {
            value,
            provenance,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Truncate to at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("żółw", 2), "żó");
    }
}
