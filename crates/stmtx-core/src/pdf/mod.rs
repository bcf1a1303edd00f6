//! PDF text acquisition module.

mod extractor;

pub use extractor::{PdfContent, PdfExtractor, PdfPage};

use crate::error::PdfError;

/// How much text a PDF yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Too little text, most likely a scanned document.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text acquisition implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text page by page. A page that cannot be read contributes an
    /// empty string.
    fn extract_pages(&self) -> Result<Vec<PdfPage>>;

    /// Extract the text of all pages joined with newlines.
    fn extract_text(&self) -> Result<String> {
        let pages = self.extract_pages()?;
        Ok(pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
