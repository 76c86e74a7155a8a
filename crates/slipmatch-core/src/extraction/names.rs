//! Supplier / taxpayer name extraction.

use std::collections::BTreeSet;

use tracing::debug;

use super::strategy::name_rules;
use crate::models::document::DocumentKind;

/// Collect every name captured by the kind's rules.
///
/// Captures are kept verbatim unless `trim` is set.
pub fn extract_names(text: &str, kind: DocumentKind, trim: bool) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for rule in name_rules(kind) {
        for found in rule.captures(text) {
            debug!("{} matched name {:?}", rule.name, found.value);
            let name = if trim {
                found.value.trim().to_string()
            } else {
                found.value
            };
            if !name.is_empty() {
                names.insert(name);
            }
        }
    }

    names
}
