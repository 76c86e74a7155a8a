//! Amount normalization for Brazilian payment documents.
//!
//! Producers mix `1.234,56` and `1,234.56` inconsistently, so the decimal
//! separator is inferred per occurrence rather than per document.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::AmountParseError;

/// How a comma is read when it is the only separator present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoneComma {
    /// `100,00` is one hundred.
    Decimal,
    /// `1,234` is one thousand two hundred thirty-four; any other lone
    /// comma is still a decimal separator.
    ThousandsWhenGrouped,
}

/// Separator sub-policy selected per extraction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorPolicy {
    pub lone_comma: LoneComma,
    /// Read `136.06406` as `136.064,06` with its comma lost.
    pub five_digit_fraction: bool,
}

impl SeparatorPolicy {
    /// Default policy: a lone comma is decimal, no five-digit repair.
    pub const STANDARD: Self = Self {
        lone_comma: LoneComma::Decimal,
        five_digit_fraction: false,
    };

    /// A lone comma followed by exactly three digits groups thousands.
    pub const GROUPED_COMMA: Self = Self {
        lone_comma: LoneComma::ThousandsWhenGrouped,
        five_digit_fraction: false,
    };

    /// Standard policy plus the five-digit fraction repair.
    pub const FIVE_DIGIT_FRACTION: Self = Self {
        lone_comma: LoneComma::Decimal,
        five_digit_fraction: true,
    };
}

impl Default for SeparatorPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Normalize a raw amount with the standard separator policy.
pub fn normalize_amount(raw: &str) -> Result<Decimal, AmountParseError> {
    normalize_with(raw, SeparatorPolicy::STANDARD)
}

/// Normalize a raw amount substring into a decimal rounded to 2 places.
pub fn normalize_with(raw: &str, policy: SeparatorPolicy) -> Result<Decimal, AmountParseError> {
    let cleaned = strip_currency(raw);
    let canonical = canonicalize(&cleaned, policy);

    Decimal::from_str(&canonical)
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .map_err(|_| AmountParseError::new(raw))
}

fn strip_currency(raw: &str) -> String {
    raw.replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect()
}

fn canonicalize(s: &str, policy: SeparatorPolicy) -> String {
    match (s.rfind(','), s.rfind('.')) {
        // The separator that occurs later is the decimal one
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(comma), None) => match policy.lone_comma {
            LoneComma::ThousandsWhenGrouped if is_thousands_group(s, comma) => s.replace(',', ""),
            _ => s.replace(',', "."),
        },
        (None, Some(dot)) if policy.five_digit_fraction && is_five_digit_fraction(s, dot) => {
            let digits = s.replace('.', "");
            let (units, cents) = digits.split_at(digits.len() - 2);
            format!("{units}.{cents}")
        }
        _ => s.to_string(),
    }
}

fn is_thousands_group(s: &str, comma: usize) -> bool {
    let tail = &s[comma + 1..];
    s.matches(',').count() == 1 && tail.len() == 3 && tail.chars().all(|c| c.is_ascii_digit())
}

fn is_five_digit_fraction(s: &str, dot: usize) -> bool {
    let tail = &s[dot + 1..];
    s.matches('.').count() == 1
        && dot > 0
        && tail.len() == 5
        && tail.chars().all(|c| c.is_ascii_digit())
}

/// Format amount in Brazilian style (1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = unsigned.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_mixed_separators() {
        assert_eq!(normalize_amount("1.234,56"), Ok(dec("1234.56")));
        assert_eq!(normalize_amount("1,234.56"), Ok(dec("1234.56")));
        assert_eq!(normalize_amount("12.345.678,90"), Ok(dec("12345678.90")));
        assert_eq!(normalize_amount("12,345,678.90"), Ok(dec("12345678.90")));
    }

    #[test]
    fn test_lone_comma_is_decimal() {
        assert_eq!(normalize_amount("100,00"), Ok(dec("100.00")));
        assert_eq!(normalize_amount("1,234"), Ok(dec("1.23")));
    }

    #[test]
    fn test_lone_comma_grouped_policy() {
        let policy = SeparatorPolicy::GROUPED_COMMA;
        assert_eq!(normalize_with("1,234", policy), Ok(dec("1234")));
        assert_eq!(normalize_with("100,00", policy), Ok(dec("100.00")));
        assert_eq!(normalize_with("1,2345", policy), Ok(dec("1.23")));
    }

    #[test]
    fn test_currency_and_whitespace_are_stripped() {
        assert_eq!(normalize_amount("R$ 1 234,56"), Ok(dec("1234.56")));
        assert_eq!(normalize_amount("$1,234.56"), Ok(dec("1234.56")));
        assert_eq!(normalize_amount("1\u{00a0}234,56"), Ok(dec("1234.56")));
    }

    #[test]
    fn test_canonical_input_is_idempotent() {
        assert_eq!(normalize_amount("1234.56"), Ok(dec("1234.56")));
        assert_eq!(normalize_amount("1234"), Ok(dec("1234")));
        let once = normalize_amount("1234.56").unwrap();
        assert_eq!(normalize_amount(&once.to_string()), Ok(once));
    }

    #[test]
    fn test_rounds_to_two_places() {
        assert_eq!(normalize_amount("10,005"), Ok(dec("10.01")));
        assert_eq!(normalize_amount("1.23456"), Ok(dec("1.23")));
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(normalize_amount("abc"), Err(AmountParseError::new("abc")));
        assert!(normalize_amount("").is_err());
        assert!(normalize_amount("1.234.567").is_err());
        assert!(normalize_amount("1,2,3").is_err());
    }

    #[test]
    fn test_five_digit_fraction_repair() {
        let policy = SeparatorPolicy::FIVE_DIGIT_FRACTION;
        assert_eq!(normalize_with("136.06406", policy), Ok(dec("136064.06")));
        // Only applies to exactly five fractional digits
        assert_eq!(normalize_with("136.06", policy), Ok(dec("136.06")));
        assert_eq!(normalize_with("1.234,56", policy), Ok(dec("1234.56")));
        // Not applied under the standard policy
        assert_eq!(normalize_amount("136.06406"), Ok(dec("136.06")));
    }

    #[test]
    fn test_five_digit_fraction_misfires_on_precise_values() {
        // Known precision risk: a genuine 5-decimal figure is read as cents.
        let policy = SeparatorPolicy::FIVE_DIGIT_FRACTION;
        assert_eq!(normalize_with("1.23456", policy), Ok(dec("1234.56")));
    }

    #[test]
    fn test_format_brl_amount() {
        assert_eq!(format_brl_amount(dec("1234.56")), "1.234,56");
        assert_eq!(format_brl_amount(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_brl_amount(dec("5")), "5,00");
        assert_eq!(format_brl_amount(dec("-1234.5")), "-1.234,50");
    }
}
