//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, StmtxError};

/// Main configuration for the stmtx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtxConfig {
    /// PDF text acquisition configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// PDF text acquisition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Documents with less extracted text than this are reported as
    /// probably scanned.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum length of the cardholder name, in characters.
    pub max_name_length: usize,

    /// Maximum length of the statement period, in characters.
    pub max_period_length: usize,

    /// Number of leading lines scanned for an unlabeled cardholder name.
    pub name_scan_lines: usize,

    /// Year assumed for dates written without one (e.g. "March 3rd").
    /// Defaults to the current year.
    pub default_year: Option<i32>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_name_length: 50,
            max_period_length: 100,
            name_scan_lines: 15,
            default_year: None,
        }
    }
}

impl StmtxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StmtxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StmtxConfig =
            serde_json::from_str(r#"{"extraction": {"default_year": 2024}}"#).unwrap();

        assert_eq!(config.extraction.default_year, Some(2024));
        assert_eq!(config.extraction.max_name_length, 50);
        assert_eq!(config.extraction.name_scan_lines, 15);
        assert_eq!(config.pdf, PdfConfig::default());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = StmtxConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, StmtxError::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StmtxConfig::default();
        config.pdf.max_pages = 3;
        config.save(&path).unwrap();

        assert_eq!(StmtxConfig::from_file(&path).unwrap(), config);
    }
}
