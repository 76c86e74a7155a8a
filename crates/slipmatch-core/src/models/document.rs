//! Document records produced by classification and extraction.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of an input document, derived once from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Government tax-payment slip (DARF).
    Slip,
    /// Bank proof-of-payment (Comprovante).
    Receipt,
    /// Neither; ignored by extraction and pairing.
    Unclassified,
}

impl DocumentKind {
    pub fn is_classified(self) -> bool {
        !matches!(self, DocumentKind::Unclassified)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentKind::Slip => "slip",
            DocumentKind::Receipt => "receipt",
            DocumentKind::Unclassified => "unclassified",
        };
        f.write_str(label)
    }
}

/// A named file as handed to a processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// Original filename (no directory component).
    pub filename: String,
    /// Raw PDF bytes.
    pub data: Vec<u8>,
}

impl InputDocument {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// One input file together with everything extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Original filename.
    pub filename: String,
    /// Original file content, kept for merging.
    pub content: Vec<u8>,
    /// Classification result.
    pub kind: DocumentKind,
    /// Supplier / taxpayer names, kept verbatim.
    pub names: BTreeSet<String>,
    /// Monetary amounts rounded to two fractional digits.
    pub amounts: BTreeSet<Decimal>,
    /// CNPJ-like identifiers, digits only.
    pub tax_ids: BTreeSet<String>,
    /// Set when the text of this file could not be read.
    pub text_error: Option<String>,
}

impl DocumentRecord {
    /// Record with no extracted fields yet.
    pub fn new(filename: impl Into<String>, content: Vec<u8>, kind: DocumentKind) -> Self {
        Self {
            filename: filename.into(),
            content,
            kind,
            names: BTreeSet::new(),
            amounts: BTreeSet::new(),
            tax_ids: BTreeSet::new(),
            text_error: None,
        }
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_amounts<I: IntoIterator<Item = Decimal>>(mut self, amounts: I) -> Self {
        self.amounts = amounts.into_iter().collect();
        self
    }

    pub fn with_tax_ids<I, S>(mut self, tax_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tax_ids = tax_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_slip(&self) -> bool {
        self.kind == DocumentKind::Slip
    }

    pub fn is_receipt(&self) -> bool {
        self.kind == DocumentKind::Receipt
    }

    /// Whether both records share at least one name.
    pub fn shares_name(&self, other: &DocumentRecord) -> bool {
        !self.names.is_disjoint(&other.names)
    }

    /// Whether both records share at least one amount.
    pub fn shares_amount(&self, other: &DocumentRecord) -> bool {
        !self.amounts.is_disjoint(&other.amounts)
    }

    /// Whether both records share at least one tax identifier.
    pub fn shares_tax_id(&self, other: &DocumentRecord) -> bool {
        !self.tax_ids.is_disjoint(&other.tax_ids)
    }
}
