//! CNPJ extraction.

use std::collections::BTreeSet;

use super::patterns::CNPJ;

/// Every CNPJ-like number in `text`, reduced to its digits.
pub fn extract_tax_ids(text: &str) -> BTreeSet<String> {
    CNPJ.find_iter(text)
        .map(|m| m.as_str().chars().filter(|c| c.is_ascii_digit()).collect())
        .collect()
}

/// Format a 14-digit CNPJ as `12.345.678/0001-90`.
pub fn format_cnpj(digits: &str) -> Option<String> {
    if digits.len() != 14 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_formatted_and_bare() {
        let text = "CNPJ: 12.345.678/0001-90\nContribuinte 98765432000110";
        let ids = extract_tax_ids(text);

        assert!(ids.contains("12345678000190"));
        assert!(ids.contains("98765432000110"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let text = "12.345.678/0001-90 e 12345678000190";
        assert_eq!(extract_tax_ids(text).len(), 1);
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(
            format_cnpj("12345678000190").as_deref(),
            Some("12.345.678/0001-90")
        );
        assert_eq!(format_cnpj("123"), None);
    }
}
