//! Currency normalization for US tax-form amounts.

use super::patterns::{CURRENCY_TOKEN, SSN_FRAGMENT};

/// Normalize a captured amount to a bare signed numeral string.
///
/// The last amount-shaped token in `value` wins. A token wrapped in
/// parentheses is negative (`(1,234)` -> `-1234`). Thousands separators,
/// `$` and spaces are removed; the decimal point survives only with
/// `keep_decimal`. Tokens carrying fewer than `min_digits` digits are
/// rejected so box and line numbers are not mistaken for amounts.
pub fn normalize_currency(value: &str, min_digits: usize, keep_decimal: bool) -> Option<String> {
    let token = CURRENCY_TOKEN.find_iter(value).last()?.as_str();
    let negative = token.starts_with('(') && token.ends_with(')');

    let cleaned: String = token
        .chars()
        .filter(|c| !matches!(c, ' ' | ',' | '$' | '(' | ')'))
        .filter(|c| keep_decimal || *c != '.')
        .collect();

    if cleaned.is_empty() || digit_count(&cleaned) < min_digits {
        return None;
    }

    if negative {
        Some(format!("-{}", cleaned))
    } else {
        Some(cleaned)
    }
}

/// Number of ASCII digits in a string.
pub fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

/// A negative four-digit value such as `-6789`, which in OCR'd forms is far
/// more often the tail of an SSN than a dollar amount.
pub fn looks_like_ssn_fragment(value: &str) -> bool {
    SSN_FRAGMENT.is_match(value)
}
