//! Core library for credit-card statement field extraction.
//!
//! This crate provides:
//! - PDF text acquisition (`pdf` feature)
//! - Issuer detection for Chase, Bank of America, Citi, American Express
//!   and Capital One
//! - Rule cascades for cardholder name, card last 4, statement period,
//!   payment due date and new balance
//! - Date and amount normalization

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod statement;

pub use error::{PdfError, Result, StmtxError};
pub use models::config::{ExtractionConfig, PdfConfig, StmtxConfig};
pub use models::statement::{Field, FieldRecord, Issuer};
#[cfg(feature = "pdf")]
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use statement::rules::{
    detect_issuer, normalize_date, parse_amount, DateNormalizer, Provenance, Tier,
};
pub use statement::{extract_fields, CascadeParser, ExtractionResult, StatementParser};

#[cfg(feature = "pdf")]
use std::path::Path;

/// Acquire the text of a PDF, page texts joined with newlines.
#[cfg(feature = "pdf")]
pub fn pdf_text(data: &[u8], config: &PdfConfig) -> Result<String> {
    let mut extractor = PdfExtractor::new().with_max_pages(config.max_pages);
    extractor.load(data)?;
    Ok(extractor.extract_all(config.min_text_length)?.text)
}

/// Read a statement PDF from disk and extract its fields.
#[cfg(feature = "pdf")]
pub fn parse_pdf(path: &Path, config: &StmtxConfig) -> Result<ExtractionResult> {
    let data = std::fs::read(path)?;
    let text = pdf_text(&data, &config.pdf)?;
    Ok(CascadeParser::from_config(&config.extraction).parse(&text))
}
