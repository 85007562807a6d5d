//! SSN and personal-name normalization.

/// Format a Social Security Number as `###-##-####`.
///
/// Everything except digits is discarded first; anything other than exactly
/// nine digits is rejected.
pub fn normalize_ssn(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 {
        return None;
    }
    Some(format!("{}-{}-{}", &digits[0..3], &digits[3..5], &digits[5..]))
}

/// Keep letters, whitespace, periods, apostrophes and hyphens; collapse
/// whitespace.
pub fn normalize_name(value: &str) -> Option<String> {
    let kept: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();
    non_empty(collapse_whitespace(&kept))
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
