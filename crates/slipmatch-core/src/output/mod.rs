//! Output assembly: merging matched pairs and packaging them.

mod archive;

pub use archive::ZipArchiver;

use tracing::{debug, warn};

use crate::error::{ArchiveError, MergeError};
use crate::models::report::MatchMethod;
use crate::pairing::Pairing;
use crate::pdf::DocumentMerger;

/// Packages named file contents into a single archive.
pub trait Archiver {
    fn archive(&self, entries: &[(&str, &[u8])]) -> Result<Vec<u8>, ArchiveError>;
}

/// One merged slip + receipt PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOutput {
    /// Output name: the slip's filename, verbatim.
    pub filename: String,
    pub receipt: String,
    pub method: MatchMethod,
    pub data: Vec<u8>,
}

/// A pair whose merge failed.
#[derive(Debug)]
pub struct MergeFailure {
    pub filename: String,
    pub receipt: String,
    pub method: MatchMethod,
    pub error: MergeError,
}

/// Everything produced from one pairing.
#[derive(Debug, Default)]
pub struct Assembled {
    pub merged: Vec<MergedOutput>,
    pub failures: Vec<MergeFailure>,
}

/// Merges each matched pair, isolating failures per pair.
#[derive(Debug, Clone, Default)]
pub struct OutputAssembler<M> {
    merger: M,
}

impl<M: DocumentMerger> OutputAssembler<M> {
    pub fn new(merger: M) -> Self {
        Self { merger }
    }

    pub fn assemble(&self, pairing: &Pairing<'_>) -> Assembled {
        let mut assembled = Assembled::default();

        for (filename, m) in &pairing.matches {
            let inputs = m.documents().map(|d| (d.filename.as_str(), d.content.as_slice()));

            match self.merger.merge(&inputs) {
                Ok(data) => {
                    debug!("Merged {} + {} ({} bytes)", filename, m.receipt.filename, data.len());
                    assembled.merged.push(MergedOutput {
                        filename: filename.clone(),
                        receipt: m.receipt.filename.clone(),
                        method: m.method,
                        data,
                    });
                }
                Err(error) => {
                    warn!("Failed to merge {} with {}: {}", filename, m.receipt.filename, error);
                    assembled.failures.push(MergeFailure {
                        filename: filename.clone(),
                        receipt: m.receipt.filename.clone(),
                        method: m.method,
                        error,
                    });
                }
            }
        }

        assembled
    }

    /// Archive every merged output under its own filename.
    pub fn package<A: Archiver>(
        &self,
        archiver: &A,
        merged: &[MergedOutput],
    ) -> Result<Vec<u8>, ArchiveError> {
        let entries: Vec<(&str, &[u8])> = merged
            .iter()
            .map(|m| (m.filename.as_str(), m.data.as_slice()))
            .collect();
        archiver.archive(&entries)
    }
}
