//! Ordered pattern tables driving field extraction.
//!
//! Each document kind owns a table of tiers. New layouts are supported by
//! adding rows here; the extraction loop itself never changes.

use std::collections::BTreeSet;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::amounts::{SeparatorPolicy, normalize_with};
use super::patterns::*;
use super::ExtractionMatch;
use crate::models::document::DocumentKind;

/// One label pattern and the separator policy applied to its captures.
#[derive(Debug, Clone, Copy)]
pub struct AmountRule {
    pub name: &'static str,
    pub pattern: &'static Regex,
    pub policy: SeparatorPolicy,
}

impl AmountRule {
    pub const fn new(name: &'static str, pattern: &'static Regex, policy: SeparatorPolicy) -> Self {
        Self { name, pattern, policy }
    }

    /// Every parsable amount captured by this rule. Unparsable captures are skipped.
    pub fn captures(&self, text: &str) -> Vec<ExtractionMatch<Decimal>> {
        let mut results = Vec::new();

        for caps in self.pattern.captures_iter(text) {
            let Some(raw) = caps.get(1) else { continue };

            match normalize_with(raw.as_str(), self.policy) {
                Ok(value) => {
                    debug!("{} matched {:?} -> {}", self.name, raw.as_str(), value);
                    results.push(
                        ExtractionMatch::new(value, self.name, raw.as_str())
                            .with_position(raw.start(), raw.end()),
                    );
                }
                Err(e) => warn!("{}: skipping candidate: {}", self.name, e),
            }
        }

        results
    }
}

/// How tiers combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierMode {
    /// Union of every tier's matches.
    Accumulate,
    /// Matches of the first tier that yields anything.
    FirstNonEmpty,
}

/// Tiered amount rules for one document kind, highest priority first.
#[derive(Debug, Clone)]
pub struct AmountStrategy {
    pub mode: TierMode,
    pub tiers: Vec<Vec<AmountRule>>,
}

impl AmountStrategy {
    /// Slips carry one authoritative label; every variant only adds confidence.
    pub fn slip() -> Self {
        Self {
            mode: TierMode::Accumulate,
            tiers: vec![
                vec![AmountRule::new("vl_recolhe", &AMOUNT_TO_COLLECT, SeparatorPolicy::STANDARD)],
                vec![AmountRule::new("valor_do_principal", &PRINCIPAL_VALUE, SeparatorPolicy::STANDARD)],
                vec![AmountRule::new(
                    "valor_total_documento",
                    &DOCUMENT_TOTAL_NEXT_LINE,
                    SeparatorPolicy::FIVE_DIGIT_FRACTION,
                )],
            ],
        }
    }

    /// Receipts vary in layout; stop at the most specific label that matches.
    pub fn receipt() -> Self {
        Self {
            mode: TierMode::FirstNonEmpty,
            tiers: vec![
                vec![AmountRule::new("valor_do_principal", &PRINCIPAL_VALUE, SeparatorPolicy::STANDARD)],
                vec![
                    AmountRule::new("valor_total", &TOTAL_VALUE, SeparatorPolicy::STANDARD),
                    AmountRule::new("valor_total_documento", &DOCUMENT_TOTAL, SeparatorPolicy::STANDARD),
                ],
                vec![AmountRule::new("generic_total", &GENERIC_TOTAL, SeparatorPolicy::GROUPED_COMMA)],
            ],
        }
    }

    pub fn for_kind(kind: DocumentKind) -> Option<Self> {
        match kind {
            DocumentKind::Slip => Some(Self::slip()),
            DocumentKind::Receipt => Some(Self::receipt()),
            DocumentKind::Unclassified => None,
        }
    }

    /// Run the tiers over `text`.
    pub fn matches(&self, text: &str) -> Vec<ExtractionMatch<Decimal>> {
        let mut results = Vec::new();

        for (level, tier) in self.tiers.iter().enumerate() {
            let found: Vec<_> = tier.iter().flat_map(|rule| rule.captures(text)).collect();

            if self.mode == TierMode::FirstNonEmpty && !found.is_empty() {
                debug!("tier {} yielded {} amounts, skipping lower tiers", level + 1, found.len());
                return found;
            }
            results.extend(found);
        }

        results
    }

    pub fn apply(&self, text: &str) -> BTreeSet<Decimal> {
        self.matches(text).into_iter().map(|m| m.value).collect()
    }
}

/// One label pattern capturing a name in group 1.
#[derive(Debug, Clone, Copy)]
pub struct NameRule {
    pub name: &'static str,
    pub pattern: &'static Regex,
}

impl NameRule {
    pub const fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }

    pub fn captures(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), self.name, m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Name rules for a document kind.
pub fn name_rules(kind: DocumentKind) -> Vec<NameRule> {
    match kind {
        DocumentKind::Slip => vec![NameRule::new("parceiro", &SLIP_PARTNER_NAME)],
        DocumentKind::Receipt => vec![NameRule::new("nome", &RECEIPT_PAYER_NAME)],
        DocumentKind::Unclassified => Vec::new(),
    }
}
