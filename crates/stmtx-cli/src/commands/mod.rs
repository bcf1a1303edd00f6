//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use stmtx_core::models::config::StmtxConfig;

/// Load the config from `config_path`, else from the default location when a
/// file exists there, else the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StmtxConfig> {
    if let Some(path) = config_path {
        return Ok(StmtxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(StmtxConfig::from_file(&default_path)?)
    } else {
        Ok(StmtxConfig::default())
    }
}

/// Whether the file is a supported statement input.
pub fn is_supported_input(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt")
}

/// Read statement text from a PDF or an already-extracted text file.
pub fn read_statement_text(path: &Path, config: &StmtxConfig) -> anyhow::Result<String> {
    let text = match extension(path).as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            stmtx_core::pdf_text(&data, &config.pdf)?
        }
        "txt" => fs::read_to_string(path)?,
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    if text.trim().is_empty() {
        warn!("No text found in {}", path.display());
    }

    Ok(text)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
