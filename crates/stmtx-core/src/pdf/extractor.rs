//! PDF text extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// Text comes from pdf-extract; when it cannot read the document, pages are
/// read one at a time through lopdf instead.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: usize,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Whether the PDF yielded usable text.
    pub pdf_type: PdfType,
    /// Page text joined with newlines.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor reading every page.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
        }
    }

    /// Read at most `max_pages` pages (0 = all).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Extract all pages and classify the result.
    ///
    /// Documents with less than `min_text_length` characters of text are
    /// reported as [`PdfType::Empty`].
    pub fn extract_all(&self, min_text_length: usize) -> Result<PdfContent> {
        let pages = self.extract_pages()?;
        let text = pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let text_len = text.trim().chars().count();
        let pdf_type = if text_len < min_text_length {
            warn!(
                "PDF yielded only {} characters of text, it is probably scanned",
                text_len
            );
            PdfType::Empty
        } else {
            PdfType::Text
        };

        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            pages.len(),
            text_len,
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            text,
            pages,
        })
    }

    fn pages_to_read(&self) -> u32 {
        let total = self.page_count();
        if self.max_pages == 0 {
            total
        } else {
            total.min(self.max_pages as u32)
        }
    }

    /// Read pages one at a time with lopdf.
    fn extract_pages_individually(&self, doc: &Document, count: u32) -> Vec<PdfPage> {
        let numbers: Vec<u32> = doc.get_pages().keys().copied().take(count as usize).collect();

        numbers
            .into_iter()
            .map(|number| {
                let text = doc.extract_text(&[number]).unwrap_or_else(|e| {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    String::new()
                });
                PdfPage { number, text }
            })
            .collect()
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run pdf-extract on the document, turning panics on malformed input into
/// errors.
fn extract_by_pages(data: &[u8]) -> Result<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
        Err(_) => Err(PdfError::TextExtraction(
            "pdf-extract panicked on malformed document".to_string(),
        )),
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<PdfPage>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let count = self.pages_to_read();
        if count < self.page_count() {
            debug!("Reading {} of {} pages", count, self.page_count());
        }

        match extract_by_pages(&self.raw_data) {
            Ok(texts) if texts.len() as u32 >= count => Ok(texts
                .into_iter()
                .take(count as usize)
                .enumerate()
                .map(|(i, text)| PdfPage {
                    number: i as u32 + 1,
                    text,
                })
                .collect()),
            Ok(texts) => {
                warn!(
                    "pdf-extract returned {} pages for a {} page document, reading pages individually",
                    texts.len(),
                    self.page_count()
                );
                Ok(self.extract_pages_individually(doc, count))
            }
            Err(e) => {
                warn!("{}, reading pages individually", e);
                Ok(self.extract_pages_individually(doc, count))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one Helvetica text line per page.
    fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let content = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", text);
                let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                    "Contents" => content_id,
                    "Resources" => dictionary! {
                        "Font" => dictionary! { "F1" => font_id },
                    },
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_text_from_pages() {
        let data = make_test_pdf(&["Chase Sapphire", "New Balance 12.00"]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        assert_eq!(extractor.page_count(), 2);
        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].text.contains("Chase"));

        let text = extractor.extract_text().unwrap();
        assert!(text.contains("Sapphire"));
        assert!(text.contains("Balance"));
    }

    #[test]
    fn test_max_pages_limits_extraction() {
        let data = make_test_pdf(&["first page", "second page", "third page"]);
        let mut extractor = PdfExtractor::new().with_max_pages(2);
        extractor.load(&data).unwrap();

        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(!extractor.extract_text().unwrap().contains("third"));
    }

    #[test]
    fn test_short_text_reported_as_empty() {
        let data = make_test_pdf(&["Hi"]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        assert_eq!(extractor.extract_all(50).unwrap().pdf_type, PdfType::Empty);
        assert_eq!(extractor.extract_all(1).unwrap().pdf_type, PdfType::Text);
    }

    #[test]
    fn test_invalid_pdf_returns_error() {
        let mut extractor = PdfExtractor::new();
        assert!(matches!(extractor.load(b"not a pdf"), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_extract_without_load_fails() {
        assert!(PdfExtractor::new().extract_pages().is_err());
    }
}
