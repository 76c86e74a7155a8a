//! Run report: per-document diagnostics and per-slip match outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::{DocumentKind, DocumentRecord};

/// How a slip was paired with its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Shared name and shared amount.
    NameAndValue,
    /// Shared CNPJ and shared amount.
    IdentifierAndValue,
    /// Shared amount only.
    ValueOnly,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchMethod::NameAndValue => "name+value",
            MatchMethod::IdentifierAndValue => "identifier+value",
            MatchMethod::ValueOnly => "value only",
        };
        f.write_str(label)
    }
}

/// What was extracted from one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDiagnostics {
    pub filename: String,
    pub kind: DocumentKind,
    pub names: Vec<String>,
    pub amounts: Vec<Decimal>,
    pub tax_ids: Vec<String>,
    /// Reason the text could not be read, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_error: Option<String>,
}

impl From<&DocumentRecord> for DocumentDiagnostics {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            kind: record.kind,
            names: record.names.iter().cloned().collect(),
            amounts: record.amounts.iter().copied().collect(),
            tax_ids: record.tax_ids.iter().cloned().collect(),
            text_error: record.text_error.clone(),
        }
    }
}

/// Pairing and merge outcome for one slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipOutcome {
    /// Slip filename.
    pub slip: String,
    /// Receipt paired with the slip, if any.
    pub receipt: Option<String>,
    /// Which pass accepted the receipt.
    pub method: Option<MatchMethod>,
    /// Name of the merged output, when the merge succeeded.
    pub output: Option<String>,
    /// Merge failure for an accepted pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_error: Option<String>,
}

impl SlipOutcome {
    pub fn unmatched(slip: impl Into<String>) -> Self {
        Self {
            slip: slip.into(),
            receipt: None,
            method: None,
            output: None,
            merge_error: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.receipt.is_some()
    }

    pub fn is_merged(&self) -> bool {
        self.output.is_some()
    }
}

/// Full report of one processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    /// One entry per input, in input order.
    pub documents: Vec<DocumentDiagnostics>,
    /// One entry per slip, in input order.
    pub slips: Vec<SlipOutcome>,
    /// Archive file name, when an archive was produced.
    pub archive_name: Option<String>,
}

impl RunReport {
    pub fn matched_count(&self) -> usize {
        self.slips.iter().filter(|s| s.is_matched()).count()
    }

    pub fn merged_count(&self) -> usize {
        self.slips.iter().filter(|s| s.is_merged()).count()
    }

    /// Slips for which no receipt was found.
    pub fn unmatched(&self) -> impl Iterator<Item = &SlipOutcome> {
        self.slips.iter().filter(|s| !s.is_matched())
    }

    pub fn count_kind(&self, kind: DocumentKind) -> usize {
        self.documents.iter().filter(|d| d.kind == kind).count()
    }
}
