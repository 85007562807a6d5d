//! Regex patterns for financial-aid document extraction.
//!
//! Every pattern runs against whitespace-collapsed text, so a single space
//! separates what were lines in the source document. Digit classes are
//! spelled `[0-9]` because `\d` is Unicode-aware in `regex`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Student identity
    pub static ref STUDENT_NAME: Regex = Regex::new(
        r"(?i)Student\s+Name[:\s]+([A-Za-z][A-Za-z\s.'-]{1,60}?)\s*(?:Student\s+SSN|SSN|DOB|Date|$)"
    ).unwrap();

    pub static ref STUDENT_INFORMATION_NAME: Regex = Regex::new(
        r"(?i)Student\s+Information[\s:]+Name[:\s]+([A-Za-z][A-Za-z\s.'-]{1,60}?)\s*(?:Student\s+SSN|SSN|DOB|Date|$)"
    ).unwrap();

    pub static ref STUDENT_SSN: Regex = Regex::new(
        r"(?i)Student\s+SSN[:\s#-]*([0-9\s-]{9,11})"
    ).unwrap();

    pub static ref SSN_LABELED: Regex = Regex::new(
        r"(?i)SSN[:\s#-]*([0-9\s-]{9,11})"
    ).unwrap();

    pub static ref SSN_DASHED: Regex = Regex::new(
        r"([0-9]{3}-[0-9]{2}-[0-9]{4})"
    ).unwrap();

    pub static ref SSN_DASHED_WORD: Regex = Regex::new(
        r"\b([0-9]{3}-[0-9]{2}-[0-9]{4})\b"
    ).unwrap();

    pub static ref DOB_SEPARATED: Regex = Regex::new(
        r"(?i)(Date\s+of\s+Birth|DOB)[:\s]+([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{2,4})"
    ).unwrap();

    pub static ref DOB_COMPACT: Regex = Regex::new(
        r"(?i)(DOB)[:\s]+([0-9]{8})"
    ).unwrap();

    // Adjusted gross income
    pub static ref AGI_LABELED: Regex = Regex::new(
        r"(?i)Adjusted\s+Gross\s+Income(?:\s*\(AGI\))?\s+(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref AGI_ABBREVIATED: Regex = Regex::new(
        r"(?i)AGI[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref AGI_LINE_11: Regex = Regex::new(
        r"(?i)\b11\s+Adjusted\s+gross\s+income[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref AGI_LINE_11_PREFIXED: Regex = Regex::new(
        r"(?i)Line\s*11[^0-9-]*Adjusted\s+gross\s+income[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    // Wages
    pub static ref WAGES_LABELED: Regex = Regex::new(
        r"(?i)Wages(?:,\s*salaries,\s*tips)?\s+(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref EARNED_INCOME: Regex = Regex::new(
        r"(?i)Earned\s+Income\s+(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref LINE_1: Regex = Regex::new(
        r"(?i)Line\s*1[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref W2_TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)Total\s+amount\s+from\s+Form\(s\)\s+W-2[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    // Total tax
    pub static ref TOTAL_TAX_PARENTHETICAL: Regex = Regex::new(
        r"(?i)Total\s+Tax[^0-9]*\(.*?\)\s*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref TOTAL_TAX: Regex = Regex::new(
        r"(?i)Total\s+Tax[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref TAX_LIABILITY: Regex = Regex::new(
        r"(?i)Tax\s+Liability[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref LINE_22: Regex = Regex::new(
        r"(?i)Line\s*22[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    // Household
    pub static ref HOUSEHOLD_SIZE: Regex = Regex::new(
        r"(?i)Household\s+Size[^0-9]*([0-9]+)"
    ).unwrap();

    pub static ref NUMBER_IN_HOUSEHOLD: Regex = Regex::new(
        r"(?i)Number\s+in\s+Household[^0-9]*([0-9]+)"
    ).unwrap();

    pub static ref NUMBER_IN_COLLEGE: Regex = Regex::new(
        r"(?i)Number\s+in\s+College[^0-9]*([0-9]+)"
    ).unwrap();

    pub static ref COLLEGE_STUDENTS: Regex = Regex::new(
        r"(?i)College\s+Students[^0-9]*([0-9]+)"
    ).unwrap();

    // Form 1040 line anchors
    pub static ref F1040_AGI_LINE_11: Regex = Regex::new(
        r"(?i)\b11\s+Adjusted\s+gross\s+income[\s\S]{0,40}?(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_AGI_LINE_REFERENCE: Regex = Regex::new(
        r"(?i)Adjusted\s+Gross\s+Income[^0-9-]*line\s*11[\s\S]{0,40}?(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_AGI_NEARBY: Regex = Regex::new(
        r"(?i)adjusted\s+gross\s+income[\s\S]{0,40}?(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_TAX_LINE_24: Regex = Regex::new(
        r"(?i)\b24\s+Total\s+tax[\s\S]{0,40}?(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_TAX_LINE_22: Regex = Regex::new(
        r"(?i)\b22\s+Total\s+tax[^0-9-]*\(.*?\)\s*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_TAX_LINE_REFERENCE: Regex = Regex::new(
        r"(?i)Total\s+tax[^0-9]*line\s*22[\s\S]{0,30}?(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_WAGES_LINE_1: Regex = Regex::new(
        r"(?i)\b1\s+Wages[\s,]+salaries[\s,]+tips[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_WAGES_LINE_PREFIXED: Regex = Regex::new(
        r"(?i)Line\s*1\s*Wages[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_WAGES_LINE_1A: Regex = Regex::new(
        r"(?i)1[a-z]?\s*Total\s+amount\s+from\s+Form\(s\)\s+W-2[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    pub static ref F1040_WAGES_LINE_1Z: Regex = Regex::new(
        r"(?i)1z\s+Add\s+lines\s+1a\s+through\s+1h[^0-9-]*(-?\(?[0-9][0-9,.]*\)?)"
    ).unwrap();

    // W-2 / 1099 boxes
    pub static ref BOX_1: Regex = Regex::new(
        r"(?i)Box\s*1[^0-9]*([0-9,.]+)"
    ).unwrap();

    pub static ref BOX_2: Regex = Regex::new(
        r"(?i)Box\s*2[^0-9]*([0-9,.]+)"
    ).unwrap();

    pub static ref W2_SOCIAL_SECURITY_WAGES: Regex = Regex::new(
        r"(?i)3\s+Social\s+security\s+wages[^0-9]*([0-9,.]+)"
    ).unwrap();

    pub static ref W2_BOX_12: Regex = Regex::new(
        r"(?i)12[a-d]?\s*[A-Z]?[^0-9]*([0-9,.]+)"
    ).unwrap();

    // Value-level patterns used by the normalizers
    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"-?\(?[0-9][0-9,]*(?:\.[0-9]{1,2})?\)?"
    ).unwrap();

    pub static ref SSN_FRAGMENT: Regex = Regex::new(
        r"^-[0-9]{4}$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_name_stops_before_next_label() {
        let caps = STUDENT_NAME
            .captures("Student Name: Alex Q. Doe Student SSN: 123 45 6789")
            .unwrap();
        assert_eq!(&caps[1], "Alex Q. Doe");
    }

    #[test]
    fn test_student_name_runs_to_end_of_text() {
        let caps = STUDENT_NAME.captures("Student Name: Jo-Ann O'Neil").unwrap();
        assert_eq!(&caps[1], "Jo-Ann O'Neil");
    }

    #[test]
    fn test_dob_uses_second_group() {
        let caps = DOB_SEPARATED.captures("Date of Birth: 01-02-2003").unwrap();
        assert_eq!(&caps[2], "01-02-2003");
    }

    #[test]
    fn test_parenthetical_total_tax() {
        let caps = TOTAL_TAX_PARENTHETICAL
            .captures("22 Total tax (Form 1040, line 22) (1,234) Household")
            .unwrap();
        assert_eq!(&caps[1], "(1,234)");
    }

    #[test]
    fn test_line_24_total_tax() {
        let caps = F1040_TAX_LINE_24
            .captures("22 Total tax (Form 1040, line 22) 876 24 Total tax 4,395")
            .unwrap();
        assert_eq!(&caps[1], "4,395");
    }

    #[test]
    fn test_box_12_code() {
        let caps = W2_BOX_12.captures("3 Social security wages 34000 12a D 500").unwrap();
        assert_eq!(&caps[1], "500");
    }

    #[test]
    fn test_digit_classes_are_ascii() {
        assert!(!SSN_DASHED.is_match("١٢٣-٤٥-٦٧٨٩"));
    }
}
