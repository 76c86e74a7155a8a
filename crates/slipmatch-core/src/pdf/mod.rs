//! PDF collaborators: text extraction and page merging.

mod extractor;
mod merger;

pub use extractor::{PdfDocument, PdfExtractor};
pub use merger::LopdfMerger;

use crate::error::{MergeError, PdfError};

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Reads the linear text of a PDF.
pub trait TextExtractor {
    /// Text of every page concatenated in page order, with no separator.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Combines several PDFs into one.
pub trait DocumentMerger {
    /// Merge `(filename, bytes)` inputs; pages keep input order.
    fn merge(&self, documents: &[(&str, &[u8])]) -> std::result::Result<Vec<u8>, MergeError>;
}

/// Load a PDF, decrypting it when it only carries an empty user password.
///
/// The flag tells whether decryption took place.
pub(crate) fn load_document(data: &[u8]) -> Result<(lopdf::Document, bool)> {
    let mut doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    let encrypted = doc.is_encrypted();
    if encrypted {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        tracing::debug!("Decrypted PDF with empty password");
    }

    if doc.get_pages().is_empty() {
        return Err(PdfError::NoPages);
    }

    Ok((doc, encrypted))
}
