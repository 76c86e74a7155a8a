//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{Result, TextExtractor, load_document};
use crate::error::PdfError;

/// A loaded PDF ready for text extraction.
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Load a PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let (mut document, encrypted) = load_document(data)?;

        // pdf-extract reads bytes, so hand it the decrypted document
        let raw_data = if encrypted {
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        debug!("Loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document, raw_data })
    }

    /// Get the number of pages in the PDF.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract the text of each page, in page order.
    pub fn page_texts(&self) -> Result<Vec<String>> {
        // pdf-extract panics on some malformed content streams
        let data = &self.raw_data;
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data))
            .map_err(|_| PdfError::TextExtraction("text extractor panicked".to_string()))?
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Page texts joined without a separator.
    pub fn text(&self) -> Result<String> {
        let text = self.page_texts()?.concat();
        debug!("Extracted {} chars from {} pages", text.len(), self.page_count());
        Ok(text)
    }
}

/// Text extractor backed by pdf-extract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        PdfDocument::load(data)?.text()
    }
}
