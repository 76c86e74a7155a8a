//! Field extraction from raw document text.

pub mod amounts;
pub mod names;
pub mod patterns;
pub mod strategy;
pub mod tax_ids;

pub use amounts::{LoneComma, SeparatorPolicy, format_brl_amount, normalize_amount, normalize_with};
pub use strategy::{AmountRule, AmountStrategy, NameRule, TierMode};

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::document::{DocumentKind, DocumentRecord};

/// A value captured by a named rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced it.
    pub rule: &'static str,
    /// Source text that was matched.
    pub source: String,
    /// Byte range of `source` in the document text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            source: source.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Per-kind extraction of names, amounts, and CNPJs.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    trim_names: bool,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_trimmed_names(config.trim_names)
    }

    /// Strip surrounding whitespace from captured names.
    pub fn with_trimmed_names(mut self, trim: bool) -> Self {
        self.trim_names = trim;
        self
    }

    pub fn extract_names(&self, text: &str, kind: DocumentKind) -> BTreeSet<String> {
        names::extract_names(text, kind, self.trim_names)
    }

    pub fn extract_amounts(&self, text: &str, kind: DocumentKind) -> BTreeSet<Decimal> {
        AmountStrategy::for_kind(kind)
            .map(|strategy| strategy.apply(text))
            .unwrap_or_default()
    }

    pub fn extract_tax_ids(&self, text: &str, kind: DocumentKind) -> BTreeSet<String> {
        if kind.is_classified() {
            tax_ids::extract_tax_ids(text)
        } else {
            BTreeSet::new()
        }
    }

    /// Fill a record's field sets from its text.
    pub fn populate(&self, record: &mut DocumentRecord, text: &str) {
        record.names = self.extract_names(text, record.kind);
        record.amounts = self.extract_amounts(text, record.kind);
        record.tax_ids = self.extract_tax_ids(text, record.kind);

        debug!(
            "{} ({}): {} names, {} amounts, {} tax ids",
            record.filename,
            record.kind,
            record.names.len(),
            record.amounts.len(),
            record.tax_ids.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_populate_slip() {
        let text = "DARF\nParceiro : Acme Ltda 123\nCNPJ 12.345.678/0001-90\nVl.Recolhe : 1.234,56\n";
        let mut record = DocumentRecord::new("DARF_A.pdf", vec![], DocumentKind::Slip);

        FieldExtractor::new().populate(&mut record, text);

        assert_eq!(record.names.iter().collect::<Vec<_>>(), vec!["Acme Ltda "]);
        assert_eq!(
            record.amounts.iter().copied().collect::<Vec<_>>(),
            vec![Decimal::from_str("1234.56").unwrap()]
        );
        assert_eq!(record.tax_ids.iter().collect::<Vec<_>>(), vec!["12345678000190"]);
    }

    #[test]
    fn test_unclassified_is_ignored() {
        let text = "Parceiro : Acme 1\nVl.Recolhe : 10,00\n12.345.678/0001-90";
        let mut record = DocumentRecord::new("readme.pdf", vec![], DocumentKind::Unclassified);

        FieldExtractor::new().populate(&mut record, text);

        assert!(record.names.is_empty());
        assert!(record.amounts.is_empty());
        assert!(record.tax_ids.is_empty());
    }

    #[test]
    fn test_page_boundary_is_not_separated() {
        // Pages are joined without a separator, so a label split across
        // a page boundary still matches.
        let pages = ["... Vl.Reco", "lhe : 50,00"];
        let text: String = pages.concat();

        let amounts = FieldExtractor::new().extract_amounts(&text, DocumentKind::Slip);
        assert!(amounts.contains(&Decimal::from_str("50.00").unwrap()));
    }
}
