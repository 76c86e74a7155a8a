//! Core library for pairing DARF payment slips with bank payment receipts.
//!
//! This crate provides:
//! - Document classification by filename (slip, receipt, unclassified)
//! - Field extraction (names, CNPJ identifiers, monetary amounts)
//! - Amount normalization across Brazilian and US separator conventions
//! - Slip/receipt pairing with traceable match methods
//! - PDF text extraction, PDF merging, and zip packaging of the results

pub mod classifier;
pub mod error;
pub mod extraction;
pub mod models;
pub mod output;
pub mod pairing;
pub mod pdf;
pub mod pipeline;

pub use classifier::{Classifier, classify};
pub use error::{AmountParseError, MergeError, PdfError, Result, SlipmatchError};
pub use extraction::{FieldExtractor, normalize_amount};
pub use models::config::SlipmatchConfig;
pub use models::document::{DocumentKind, DocumentRecord, InputDocument};
pub use models::report::{DocumentDiagnostics, MatchMethod, RunReport, SlipOutcome};
pub use output::{Archiver, MergedOutput, OutputAssembler, ZipArchiver};
pub use pairing::{Match, Pairing, PairingEngine, pair};
pub use pdf::{DocumentMerger, LopdfMerger, PdfExtractor, TextExtractor};
pub use pipeline::{Pipeline, RunOutput};
