//! WASM bindings for credit-card statement field extraction.
//!
//! Text acquisition happens on the JavaScript side; these bindings take the
//! extracted statement text. Records are returned as plain objects with all
//! six keys present, absent fields as `null`.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use stmtx_core::models::config::ExtractionConfig;
use stmtx_core::statement::{CascadeParser, StatementParser};
use stmtx_core::Issuer;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract statement fields from text.
///
/// Takes statement text (from PDF extraction) and returns the field record.
#[wasm_bindgen]
pub fn extract_statement_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&stmtx_core::extract_fields(text))
}

/// Detect the card issuer, returning its key (e.g. "american_express").
#[wasm_bindgen]
pub fn detect_issuer(text: &str) -> Option<String> {
    stmtx_core::detect_issuer(text).map(|issuer| issuer.key().to_string())
}

/// Parse an amount such as "$1,234.56".
#[wasm_bindgen]
pub fn parse_amount(amount: &str) -> Option<f64> {
    stmtx_core::parse_amount(amount)
}

/// Normalize a date such as "March 3, 2025" to `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn normalize_date(date: &str) -> Option<String> {
    stmtx_core::normalize_date(date)
}

/// Display name of an issuer key, e.g. "capital_one" -> "Capital One".
#[wasm_bindgen]
pub fn issuer_display_name(key: &str) -> Option<String> {
    Issuer::from_str(key).map(|issuer| issuer.display_name().to_string())
}

/// Statement extractor class for browser use.
#[wasm_bindgen]
pub struct StatementExtractor {
    config: ExtractionConfig,
    parser: CascadeParser,
}

#[wasm_bindgen]
impl StatementExtractor {
    /// Create a new statement extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        Self {
            parser: CascadeParser::from_config(&config),
            config,
        }
    }

    /// Set the year used for dates written without one.
    #[wasm_bindgen]
    pub fn set_default_year(&mut self, year: Option<i32>) {
        self.config.default_year = year;
        self.parser = CascadeParser::from_config(&self.config);
    }

    /// Set the maximum cardholder name length.
    #[wasm_bindgen]
    pub fn set_max_name_length(&mut self, max_length: usize) {
        self.config.max_name_length = max_length;
        self.parser = CascadeParser::from_config(&self.config);
    }

    /// Extract the field record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).record)
    }

    /// Get extraction result with provenance, missing fields and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}
