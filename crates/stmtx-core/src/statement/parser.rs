//! Document-level statement parser.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::statement::{Field, FieldRecord, Issuer};

use super::rules::{
    detect_issuer_match, BalanceExtractor, CardLast4Extractor, CardholderNameExtractor,
    DateNormalizer, DueDateExtractor, FieldExtractor, Provenance, StatementPeriodExtractor,
};

/// Result of statement extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: FieldRecord,
    /// Tier and rule behind each populated field.
    pub provenance: BTreeMap<Field, Provenance>,
    /// Fields no rule could populate.
    pub missing: Vec<Field>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for statement parsing.
///
/// Parsing never fails; fields that cannot be located are absent.
pub trait StatementParser {
    /// Parse a statement from its extracted text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Statement parser running one rule cascade per field.
pub struct CascadeParser {
    name: CardholderNameExtractor,
    card: CardLast4Extractor,
    period: StatementPeriodExtractor,
    due_date: DueDateExtractor,
    balance: BalanceExtractor,
}

impl CascadeParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            name: CardholderNameExtractor::new(),
            card: CardLast4Extractor::new(),
            period: StatementPeriodExtractor::new(),
            due_date: DueDateExtractor::new(),
            balance: BalanceExtractor::new(),
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_max_name_length(config.max_name_length)
            .with_name_scan_lines(config.name_scan_lines)
            .with_max_period_length(config.max_period_length)
            .with_default_year(config.default_year)
    }

    /// Set the maximum cardholder name length.
    pub fn with_max_name_length(mut self, max_length: usize) -> Self {
        self.name = self.name.with_max_length(max_length);
        self
    }

    /// Set how many leading lines may hold an unlabeled name.
    pub fn with_name_scan_lines(mut self, lines: usize) -> Self {
        self.name = self.name.with_scan_lines(lines);
        self
    }

    /// Set the maximum statement period length.
    pub fn with_max_period_length(mut self, max_length: usize) -> Self {
        self.period = self.period.with_max_length(max_length);
        self
    }

    /// Set the year used for dates without one (`None` = current year).
    pub fn with_default_year(mut self, year: Option<i32>) -> Self {
        self.due_date = DueDateExtractor::with_normalizer(DateNormalizer::resolve(year));
        self
    }

    fn run_field<E>(
        &self,
        extractor: &E,
        text: &str,
        issuer: Option<Issuer>,
        provenance: &mut BTreeMap<Field, Provenance>,
    ) -> Option<String>
    where
        E: FieldExtractor<Output = String>,
    {
        let field = extractor.field();
        match extractor.extract(text, issuer) {
            Some(found) => {
                debug!(
                    "{}: {:?} via {:?} rule '{}'",
                    field, found.value, found.provenance.tier, found.provenance.rule
                );
                provenance.insert(field, found.provenance);
                Some(found.value)
            }
            None => {
                debug!("{}: no rule matched", field);
                None
            }
        }
    }
}

impl Default for CascadeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser for CascadeParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut provenance = BTreeMap::new();

        let issuer = detect_issuer_match(text).map(|found| {
            debug!("issuer: {} via marker '{}'", found.value, found.provenance.rule);
            provenance.insert(Field::Issuer, found.provenance);
            found.value
        });

        let record = FieldRecord {
            issuer,
            cardholder_name: self.run_field(&self.name, text, issuer, &mut provenance),
            card_last4: self.run_field(&self.card, text, issuer, &mut provenance),
            statement_period: self.run_field(&self.period, text, issuer, &mut provenance),
            payment_due_date: self.run_field(&self.due_date, text, issuer, &mut provenance),
            new_balance: self.run_field(&self.balance, text, issuer, &mut provenance),
        };

        if record.is_empty() && !text.trim().is_empty() {
            warn!("No statement fields recognized in {} characters of text", text.len());
        }

        let missing = record.missing();
        info!(
            "Extracted {}/{} fields from {} characters (issuer: {})",
            record.populated_count(),
            Field::ALL.len(),
            text.len(),
            issuer.map(|i| i.key()).unwrap_or("unknown")
        );

        ExtractionResult {
            record,
            provenance,
            missing,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
