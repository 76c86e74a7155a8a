//! Error types for the slipmatch-core library.

use thiserror::Error;

/// Main error type for the slipmatch library.
#[derive(Error, Debug)]
pub enum SlipmatchError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// PDF merge error.
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    /// Archive packaging error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading a PDF's text.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// A candidate amount substring that is not a valid number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a valid amount: {input:?}")]
pub struct AmountParseError {
    /// The raw substring handed to the normalizer.
    pub input: String,
}

impl AmountParseError {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

/// Errors raised while merging a slip with its receipt.
#[derive(Error, Debug)]
pub enum MergeError {
    /// One of the inputs could not be loaded as a PDF.
    #[error("failed to load {filename}: {reason}")]
    Load { filename: String, reason: String },

    /// Nothing to merge.
    #[error("no documents to merge")]
    Empty,

    /// The input documents have no catalog or page tree.
    #[error("malformed document structure: {0}")]
    Structure(String),

    /// The merged document could not be serialized.
    #[error("failed to save merged PDF: {0}")]
    Save(String),
}

/// Errors raised while packaging outputs into an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Zip writer failure.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while writing entry content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the slipmatch library.
pub type Result<T> = std::result::Result<T, SlipmatchError>;
