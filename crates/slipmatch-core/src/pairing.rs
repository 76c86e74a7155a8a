//! Slip/receipt pairing.
//!
//! Each slip, in input order, is offered to the receipts in input order by a
//! sequence of passes. The first receipt accepted by a pass wins; a pass runs
//! to completion before the next one is tried. Receipts are never consumed,
//! so one receipt may back several slips.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::models::config::PairingConfig;
use crate::models::document::DocumentRecord;
use crate::models::report::MatchMethod;

/// A slip paired with the receipt proving it was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub slip: &'a DocumentRecord,
    pub receipt: &'a DocumentRecord,
    pub method: MatchMethod,
}

impl<'a> Match<'a> {
    /// The pair in merge order.
    pub fn documents(&self) -> [&'a DocumentRecord; 2] {
        [self.slip, self.receipt]
    }
}

/// Outcome of pairing one batch.
#[derive(Debug, Clone, Default)]
pub struct Pairing<'a> {
    /// Output filename (the slip's filename) to match, in slip order.
    pub matches: IndexMap<String, Match<'a>>,
    /// Slips with no eligible receipt, in input order.
    pub unmatched: Vec<&'a DocumentRecord>,
}

impl Pairing<'_> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Configurable pairing engine.
#[derive(Debug, Clone, Default)]
pub struct PairingEngine {
    identifier_pass: bool,
}

impl PairingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PairingConfig) -> Self {
        Self::new().with_identifier_pass(config.identifier_pass)
    }

    /// Enable the CNPJ+value pass between the name+value and value-only passes.
    pub fn with_identifier_pass(mut self, enabled: bool) -> Self {
        self.identifier_pass = enabled;
        self
    }

    fn passes(&self) -> Vec<MatchMethod> {
        let mut passes = vec![MatchMethod::NameAndValue];
        if self.identifier_pass {
            passes.push(MatchMethod::IdentifierAndValue);
        }
        passes.push(MatchMethod::ValueOnly);
        passes
    }

    /// Pair every slip in `documents` with a receipt.
    pub fn pair<'a>(&self, documents: &'a [DocumentRecord]) -> Pairing<'a> {
        let receipts: Vec<&DocumentRecord> = documents.iter().filter(|d| d.is_receipt()).collect();
        let passes = self.passes();
        let mut pairing = Pairing::default();

        for slip in documents.iter().filter(|d| d.is_slip()) {
            match find_receipt(slip, &receipts, &passes) {
                Some((receipt, method)) => {
                    debug!("{} -> {} ({})", slip.filename, receipt.filename, method);
                    pairing
                        .matches
                        .insert(slip.filename.clone(), Match { slip, receipt, method });
                }
                None => {
                    debug!("{}: no receipt found", slip.filename);
                    pairing.unmatched.push(slip);
                }
            }
        }

        info!(
            "paired {} slips, {} unmatched, {} receipts available",
            pairing.matches.len(),
            pairing.unmatched.len(),
            receipts.len()
        );

        pairing
    }
}

fn accepts(method: MatchMethod, slip: &DocumentRecord, receipt: &DocumentRecord) -> bool {
    match method {
        MatchMethod::NameAndValue => slip.shares_name(receipt) && slip.shares_amount(receipt),
        MatchMethod::IdentifierAndValue => slip.shares_tax_id(receipt) && slip.shares_amount(receipt),
        MatchMethod::ValueOnly => slip.shares_amount(receipt),
    }
}

fn find_receipt<'a>(
    slip: &DocumentRecord,
    receipts: &[&'a DocumentRecord],
    passes: &[MatchMethod],
) -> Option<(&'a DocumentRecord, MatchMethod)> {
    passes.iter().find_map(|&method| {
        receipts
            .iter()
            .find(|receipt| accepts(method, slip, receipt))
            .map(|receipt| (*receipt, method))
    })
}

/// Pair with the default engine (name+value, then value only).
pub fn pair(documents: &[DocumentRecord]) -> Pairing<'_> {
    PairingEngine::new().pair(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentKind;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn slip(name: &str, names: &[&str], amounts: &[&str]) -> DocumentRecord {
        DocumentRecord::new(name, vec![], DocumentKind::Slip)
            .with_names(names.iter().copied())
            .with_amounts(amounts.iter().map(|a| dec(a)))
    }

    fn receipt(name: &str, names: &[&str], amounts: &[&str]) -> DocumentRecord {
        DocumentRecord::new(name, vec![], DocumentKind::Receipt)
            .with_names(names.iter().copied())
            .with_amounts(amounts.iter().map(|a| dec(a)))
    }

    #[test]
    fn test_first_receipt_wins() {
        let docs = vec![
            slip("DARF_S.pdf", &[], &["100.00"]),
            receipt("Comprovante_R1.pdf", &[], &["100.00"]),
            receipt("Comprovante_R2.pdf", &[], &["100.00"]),
        ];

        for _ in 0..3 {
            let pairing = pair(&docs);
            let m = &pairing.matches["DARF_S.pdf"];
            assert_eq!(m.receipt.filename, "Comprovante_R1.pdf");
            assert_eq!(m.method, MatchMethod::ValueOnly);
        }
    }

    #[test]
    fn test_name_and_value_takes_precedence() {
        let docs = vec![
            slip("DARF_S.pdf", &["Acme"], &["50.00"]),
            receipt("Comprovante_R1.pdf", &["Other"], &["50.00"]),
            receipt("Comprovante_R2.pdf", &["Acme"], &["50.00"]),
        ];

        let pairing = pair(&docs);
        let m = &pairing.matches["DARF_S.pdf"];
        assert_eq!(m.receipt.filename, "Comprovante_R2.pdf");
        assert_eq!(m.method, MatchMethod::NameAndValue);
    }

    #[test]
    fn test_name_without_value_is_not_enough() {
        let docs = vec![
            slip("DARF_S.pdf", &["Acme"], &["50.00"]),
            receipt("Comprovante_R1.pdf", &["Acme"], &["51.00"]),
        ];

        let pairing = pair(&docs);
        assert!(pairing.is_empty());
        assert_eq!(pairing.unmatched.len(), 1);
    }

    #[test]
    fn test_unmatched_slip_is_absent() {
        let docs = vec![
            slip("DARF_S.pdf", &[], &["10.00"]),
            slip("DARF_T.pdf", &[], &["20.00"]),
            receipt("Comprovante_R.pdf", &[], &["20.00"]),
        ];

        let pairing = pair(&docs);
        assert_eq!(pairing.len(), 1);
        assert!(!pairing.matches.contains_key("DARF_S.pdf"));
        assert_eq!(pairing.unmatched[0].filename, "DARF_S.pdf");
    }

    #[test]
    fn test_receipt_can_back_several_slips() {
        let docs = vec![
            slip("DARF_S.pdf", &[], &["10.00"]),
            slip("DARF_T.pdf", &[], &["10.00"]),
            receipt("Comprovante_R.pdf", &[], &["10.00"]),
        ];

        let pairing = pair(&docs);
        assert_eq!(pairing.len(), 2);
        assert!(pairing.matches.values().all(|m| m.receipt.filename == "Comprovante_R.pdf"));
    }

    #[test]
    fn test_slip_order_and_unclassified_ignored() {
        let docs = vec![
            slip("DARF_B.pdf", &[], &["1.00"]),
            DocumentRecord::new("notes.pdf", vec![], DocumentKind::Unclassified)
                .with_amounts([dec("1.00")]),
            slip("DARF_A.pdf", &[], &["1.00"]),
            receipt("Comprovante_R.pdf", &[], &["1.00"]),
        ];

        let pairing = pair(&docs);
        let keys: Vec<_> = pairing.matches.keys().cloned().collect();
        assert_eq!(keys, vec!["DARF_B.pdf", "DARF_A.pdf"]);
    }

    #[test]
    fn test_slips_never_pair_with_slips() {
        let docs = vec![
            slip("DARF_S.pdf", &["Acme"], &["1.00"]),
            slip("DARF_T.pdf", &["Acme"], &["1.00"]),
        ];

        assert!(pair(&docs).is_empty());
    }

    #[test]
    fn test_identifier_pass() {
        let docs = vec![
            slip("DARF_S.pdf", &[], &["75.00"]).with_tax_ids(["12345678000190"]),
            receipt("Comprovante_R1.pdf", &[], &["75.00"]),
            receipt("Comprovante_R2.pdf", &[], &["75.00"]).with_tax_ids(["12345678000190"]),
        ];

        let default = pair(&docs);
        assert_eq!(default.matches["DARF_S.pdf"].receipt.filename, "Comprovante_R1.pdf");

        let engine = PairingEngine::new().with_identifier_pass(true);
        let pairing = engine.pair(&docs);
        let m = &pairing.matches["DARF_S.pdf"];
        assert_eq!(m.receipt.filename, "Comprovante_R2.pdf");
        assert_eq!(m.method, MatchMethod::IdentifierAndValue);
    }

    #[test]
    fn test_duplicate_slip_names_keep_last_match() {
        let docs = vec![
            slip("DARF_S.pdf", &[], &["1.00"]),
            slip("DARF_S.pdf", &[], &["2.00"]),
            receipt("Comprovante_R1.pdf", &[], &["1.00"]),
            receipt("Comprovante_R2.pdf", &[], &["2.00"]),
        ];

        let pairing = pair(&docs);
        assert_eq!(pairing.len(), 1);
        assert_eq!(pairing.matches["DARF_S.pdf"].receipt.filename, "Comprovante_R2.pdf");
    }
}
