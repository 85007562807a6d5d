//! The two rule catalogs: summary rules that apply to every document, and
//! rules anchored on the layout of one document type.

use lazy_static::lazy_static;

use super::patterns::*;
use super::{HeuristicRule, ValueTransform};
use crate::models::document::DocumentType;
use crate::models::question::Question;

/// Minimum digit count for amounts matched through loose labels.
const LABELED_AMOUNT_MIN_DIGITS: usize = 3;

lazy_static! {
    static ref SUMMARY_RULES: Vec<HeuristicRule> = vec![
        HeuristicRule::new(
            Question::StudentLegalName,
            "Student legal name",
            vec![&*STUDENT_NAME, &*STUDENT_INFORMATION_NAME],
        )
        .with_transform(ValueTransform::Name)
        .with_confidence(0.95),
        HeuristicRule::new(
            Question::StudentSsn,
            "Student Social Security Number",
            vec![&*STUDENT_SSN, &*SSN_LABELED, &*SSN_DASHED],
        )
        .with_transform(ValueTransform::Ssn)
        .with_confidence(0.95),
        HeuristicRule::new(
            Question::StudentDob,
            "Student date of birth",
            vec![&*DOB_SEPARATED, &*DOB_COMPACT],
        )
        .with_transform(ValueTransform::Date)
        .with_confidence(0.9),
        HeuristicRule::new(
            Question::ParentAgi,
            "Adjusted Gross Income",
            vec![&*AGI_LABELED, &*AGI_ABBREVIATED, &*AGI_LINE_11, &*AGI_LINE_11_PREFIXED],
        )
        .with_transform(ValueTransform::dollars(LABELED_AMOUNT_MIN_DIGITS))
        .with_confidence(0.85),
        HeuristicRule::new(
            Question::ParentWages,
            "Parent wages, salaries, tips",
            vec![&*WAGES_LABELED, &*EARNED_INCOME, &*LINE_1, &*W2_TOTAL_AMOUNT],
        )
        .with_transform(ValueTransform::dollars(LABELED_AMOUNT_MIN_DIGITS))
        .with_confidence(0.8),
        HeuristicRule::new(
            Question::ParentUsTaxPaid,
            "Parent total tax",
            vec![&*TOTAL_TAX_PARENTHETICAL, &*TOTAL_TAX, &*TAX_LIABILITY, &*LINE_22],
        )
        .with_transform(ValueTransform::dollars(LABELED_AMOUNT_MIN_DIGITS))
        .with_confidence(0.8),
        HeuristicRule::new(
            Question::HouseholdSize,
            "Household size",
            vec![&*HOUSEHOLD_SIZE, &*NUMBER_IN_HOUSEHOLD],
        )
        .with_confidence(0.7),
        HeuristicRule::new(
            Question::NumberInCollege,
            "Number in college",
            vec![&*NUMBER_IN_COLLEGE, &*COLLEGE_STUDENTS],
        )
        .with_confidence(0.7),
    ];

    static ref FORM_1040_RULES: Vec<HeuristicRule> = vec![
        HeuristicRule::new(
            Question::ParentAgi,
            "Adjusted Gross Income (1040 line 11)",
            vec![&*F1040_AGI_LINE_11, &*F1040_AGI_LINE_REFERENCE, &*F1040_AGI_NEARBY],
        )
        .with_transform(ValueTransform::dollars(LABELED_AMOUNT_MIN_DIGITS))
        .with_confidence(0.95),
        // Line 24 is the total tax on 2021+ forms; line 22 only on older layouts.
        HeuristicRule::new(
            Question::ParentUsTaxPaid,
            "Total tax (1040)",
            vec![
                &*F1040_TAX_LINE_24,
                &*F1040_TAX_LINE_22,
                &*F1040_TAX_LINE_REFERENCE,
                &*TOTAL_TAX,
            ],
        )
        .with_transform(ValueTransform::dollars(LABELED_AMOUNT_MIN_DIGITS))
        .with_confidence(0.92),
        HeuristicRule::new(
            Question::ParentWages,
            "Wages, salaries, tips (1040 line 1)",
            vec![
                &*F1040_WAGES_LINE_1,
                &*F1040_WAGES_LINE_PREFIXED,
                &*F1040_WAGES_LINE_1A,
                &*F1040_WAGES_LINE_1Z,
            ],
        )
        .with_transform(ValueTransform::dollars(LABELED_AMOUNT_MIN_DIGITS))
        .with_confidence(0.9),
    ];

    static ref W2_RULES: Vec<HeuristicRule> = vec![
        HeuristicRule::new(Question::ParentWages, "Box 1 wages", vec![&*BOX_1])
            .with_transform(ValueTransform::dollars_and_cents(1))
            .with_confidence(0.9),
        HeuristicRule::new(
            Question::ParentUsTaxPaid,
            "Box 2 federal income tax withheld",
            vec![&*BOX_2],
        )
        .with_transform(ValueTransform::dollars_and_cents(1)),
        HeuristicRule::new(
            Question::ParentWages,
            "Line 3 social security wages",
            vec![&*W2_SOCIAL_SECURITY_WAGES],
        )
        .with_transform(ValueTransform::dollars_and_cents(1)),
        HeuristicRule::new(
            Question::ParentUntaxedIncome,
            "Box 12 retirement contributions",
            vec![&*W2_BOX_12],
        )
        .with_transform(ValueTransform::dollars_and_cents(1)),
    ];

    static ref FORM_1099_RULES: Vec<HeuristicRule> = vec![
        HeuristicRule::new(
            Question::ParentUntaxedIncome,
            "1099 distributions (Box 1)",
            vec![&*BOX_1],
        )
        .with_transform(ValueTransform::dollars(1))
        .with_confidence(0.85),
    ];

    static ref SSN_LETTER_RULES: Vec<HeuristicRule> = vec![
        HeuristicRule::new(
            Question::StudentSsn,
            "Social Security Number",
            vec![&*SSN_DASHED_WORD],
        )
        .with_transform(ValueTransform::Ssn)
        .with_confidence(0.98),
    ];
}

/// Rules applied to every document regardless of type.
pub fn summary_rules() -> &'static [HeuristicRule] {
    SUMMARY_RULES.as_slice()
}

/// Rules specific to one document type; empty for `Other`.
pub fn rules_for(document_type: DocumentType) -> &'static [HeuristicRule] {
    match document_type {
        DocumentType::Form1040 => FORM_1040_RULES.as_slice(),
        DocumentType::W2 => W2_RULES.as_slice(),
        DocumentType::Form1099 => FORM_1099_RULES.as_slice(),
        DocumentType::SsnLetter => SSN_LETTER_RULES.as_slice(),
        DocumentType::Other => &[],
    }
}
