//! Date normalization to `MM/DD/YYYY`.

use super::identity::non_empty;

/// Normalize a captured date.
///
/// `M/D/YY`-style input is padded and two-digit years become `20YY`. An
/// eight-digit run is read as `MMDDYYYY`. Anything else is returned with
/// whitespace removed and dashes turned into slashes.
pub fn normalize_date(value: &str) -> Option<String> {
    let trimmed = value.trim();

    let parts: Vec<&str> = trimmed.split(['/', '-']).filter(|p| !p.is_empty()).collect();
    if let [month, day, year] = parts.as_slice() {
        let year = if year.len() == 2 {
            format!("20{}", year)
        } else {
            (*year).to_string()
        };
        return Some(format!("{:0>2}/{:0>2}/{}", month, day, year));
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 8 {
        return Some(format!("{}/{}/{}", &digits[0..2], &digits[2..4], &digits[4..]));
    }

    let collapsed: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '-' { '/' } else { c })
        .collect();
    non_empty(collapsed)
}
