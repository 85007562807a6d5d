//! The extraction engine: summary rules, type rules, block heuristics, merge.

use tracing::{debug, info};

use super::FieldExtractor;
use super::blocks::{self, IncomeBlockDetector, TaxBlockDetector};
use super::matcher::RuleSet;
use super::merge::merge_fields;
use crate::models::config::ExtractionConfig;
use crate::models::document::DocumentType;
use crate::models::field::ExtractedField;

/// Rule-based field extraction over recovered document text.
///
/// The engine holds no state between calls, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct FieldEngine {
    block_detection: bool,
    min_confidence: f64,
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldEngine {
    /// Engine with block detection on and no confidence threshold.
    pub fn new() -> Self {
        Self {
            block_detection: true,
            min_confidence: 0.0,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_block_detection(config.block_detection)
            .with_min_confidence(config.min_confidence)
    }

    /// Toggle the 1040 numeric block heuristics.
    pub fn with_block_detection(mut self, enabled: bool) -> Self {
        self.block_detection = enabled;
        self
    }

    /// Drop merged fields scoring below `confidence`.
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence;
        self
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Extract and merge every candidate field from `text`.
    pub fn extract(&self, text: &str, document_type: DocumentType) -> Vec<ExtractedField> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let summary = RuleSet::summary();
        let typed = RuleSet::for_document(document_type);
        let income = IncomeBlockDetector::new();
        let tax = TaxBlockDetector::new();

        let mut passes: Vec<&dyn FieldExtractor> = vec![&summary, &typed];
        if self.block_detection && blocks::applies_to(document_type) {
            passes.push(&income);
            passes.push(&tax);
        }

        let combined: Vec<ExtractedField> = passes
            .iter()
            .flat_map(|pass| {
                let fields = pass.extract(&normalized);
                debug!("{} pass produced {} fields", pass.source(), fields.len());
                fields
            })
            .collect();
        let candidates = combined.len();

        let fields: Vec<ExtractedField> = merge_fields(combined)
            .into_iter()
            .filter(|f| f.confidence >= self.min_confidence)
            .collect();

        info!(
            "Extracted {} fields ({} candidates) from {} document",
            fields.len(),
            candidates,
            document_type
        );
        fields
    }
}

/// Extract fields with the default engine.
pub fn extract_fields(text: &str, document_type: DocumentType) -> Vec<ExtractedField> {
    FieldEngine::new().extract(text, document_type)
}

/// Collapse every whitespace run, newlines included, to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FORM_1040: &str = "
        Form 1040
        1 Wages, salaries, tips 45,123
        11 Adjusted gross income (AGI) 50,987
        22 Total tax (Form 1040, line 22) (1,234)
        Household Size: 4
        Number in College: 2
    ";

    const W2: &str = "
        W-2 Wage and Tax Statement
        Box 1 Wages, tips, other comp 32,500.55
        Box 2 Federal income tax withheld 4,000
        3 Social security wages 34000
        12a D 500
    ";

    /// Preferred (first) value for a question.
    fn value<'a>(fields: &'a [ExtractedField], question_id: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|f| f.question_id == question_id)
            .map(|f| f.value.as_str())
    }

    #[test]
    fn test_1040_labeled_lines() {
        let fields = extract_fields(FORM_1040, DocumentType::Form1040);
        assert_eq!(value(&fields, "parent-wages"), Some("45123"));
        assert_eq!(value(&fields, "parent-agi"), Some("50987"));
        assert_eq!(value(&fields, "parent-us-tax-paid"), Some("-1234"));
        assert_eq!(value(&fields, "household-size"), Some("4"));
        assert_eq!(value(&fields, "number-in-college"), Some("2"));
    }

    #[test]
    fn test_w2_boxes() {
        let fields = extract_fields(W2, DocumentType::W2);
        assert_eq!(value(&fields, "parent-wages"), Some("32500.55"));
        assert_eq!(value(&fields, "parent-us-tax-paid"), Some("4000"));
        assert_eq!(value(&fields, "parent-untaxed-income"), Some("500"));

        // The summary wages rule reads a different line; both survive.
        let wages: Vec<&str> = fields
            .iter()
            .filter(|f| f.question_id == "parent-wages")
            .map(|f| f.value.as_str())
            .collect();
        assert_eq!(wages, vec!["32500.55", "34000"]);
    }

    #[test]
    fn test_w2_decimals_and_codes() {
        let text = "
            2023 Form W-2 Wage and Tax Statement
            Box1: $18,234.75
            Box 2: $987.65
            3 Social security wages 18,234.75
            12c D 750.50
        ";
        let fields = extract_fields(text, DocumentType::W2);
        assert_eq!(value(&fields, "parent-wages"), Some("18234.75"));
        assert_eq!(value(&fields, "parent-us-tax-paid"), Some("987.65"));
        assert_eq!(value(&fields, "parent-untaxed-income"), Some("750.50"));
    }

    #[test]
    fn test_identity_fields() {
        let text = "
            Student Name: Alex Q. Doe
            Student SSN: 123 45 6789
            DOB: 1/2/2003
        ";
        let fields = extract_fields(text, DocumentType::Other);
        assert_eq!(value(&fields, "student-legal-name"), Some("Alex Q. Doe"));
        assert_eq!(value(&fields, "student-ssn"), Some("123-45-6789"));
        assert_eq!(value(&fields, "student-dob"), Some("01/02/2003"));
    }

    #[test]
    fn test_prefers_line_24_total_tax() {
        let text = "
            Form 1040 (2023)
            1 Wages, salaries, tips 39,151
            11 Adjusted gross income 62,544
            22 Total tax (Form 1040, line 22) 876
            24 Total tax 4,395
        ";
        let fields = extract_fields(text, DocumentType::Form1040);
        assert_eq!(value(&fields, "parent-wages"), Some("39151"));
        assert_eq!(value(&fields, "parent-agi"), Some("62544"));
        assert_eq!(value(&fields, "parent-us-tax-paid"), Some("4395"));
        // The line 22 reading is kept as a lower-ranked alternative.
        assert!(
            fields
                .iter()
                .any(|f| f.question_id == "parent-us-tax-paid" && f.value == "876")
        );
    }

    #[test]
    fn test_2024_layout() {
        let text = "
            Form 1040 2024 U.S. Individual Income Tax Return
            1 aTotal amount from Form(s) W-2, box 1 52,400
            1z Add lines 1a through 1h 52,400
            8 Additional income from Schedule 1, line 10 1,200
            9 Add lines 1z, 2b, 3b, 4b, 5b, 6b, 7, and 8. This is your total income 53,600
            10 Adjustments to income from Schedule 1, line 26 800
            11 Subtract line 10 from line 9. This is your adjusted gross income 52,800
            22 Total tax (Form 1040, line 22) 1,234
            24 Total tax 1,876
        ";
        let fields = extract_fields(text, DocumentType::Form1040);
        assert_eq!(value(&fields, "parent-wages"), Some("52400"));
        assert_eq!(value(&fields, "parent-agi"), Some("52800"));
        assert_eq!(value(&fields, "parent-us-tax-paid"), Some("1876"));
    }

    #[test]
    fn test_unanchored_run_yields_no_income_block() {
        let run: Vec<String> = (1..=20).map(|i| format!("1,{:03}", i)).collect();
        let text = format!("Household Size: 3\n{}\nend", run.join(" "));

        let fields = extract_fields(&text, DocumentType::Form1040);
        assert_eq!(value(&fields, "household-size"), Some("3"));
        assert_eq!(value(&fields, "parent-wages"), None);
        assert_eq!(value(&fields, "parent-agi"), None);
    }

    #[test]
    fn test_block_detection_on_bare_table() {
        let text = "Income 45,000 1,200 350 2,200 800 49,550 3,100 46,450 end";
        let fields = extract_fields(text, DocumentType::Form1040);
        assert_eq!(value(&fields, "parent-agi"), Some("49550"));
        assert_eq!(value(&fields, "parent-wages"), Some("45000"));
        assert_eq!(value(&fields, "parent-us-tax-paid"), Some("46450"));

        let disabled = FieldEngine::new()
            .with_block_detection(false)
            .extract(text, DocumentType::Form1040);
        assert!(disabled.is_empty());
    }

    #[test]
    fn test_blocks_only_run_for_1040() {
        let text = "Income 45,000 1,200 350 2,200 800 49,550 3,100 46,450 end";
        assert!(extract_fields(text, DocumentType::Other).is_empty());
    }

    #[test]
    fn test_empty_input() {
        for doc_type in DocumentType::ALL {
            assert!(extract_fields("", doc_type).is_empty());
            assert!(extract_fields(" \n\t ", doc_type).is_empty());
        }
    }

    #[test]
    fn test_garbage_input_does_not_panic() {
        let text = "\u{0}\u{fffd}(((( )))) -- 12,, ,,, $$$ Box Box 1 SSN --- DOB / / 9999999999999";
        for doc_type in DocumentType::ALL {
            let _ = extract_fields(text, doc_type);
        }
    }

    #[test]
    fn test_oversized_amounts_do_not_panic() {
        for token in ["9999999999999999999999999999", "79228162514264337593543950335"] {
            let text = format!("{} end", vec![token; 10].join(" "));
            let fields = extract_fields(&text, DocumentType::Form1040);
            assert_eq!(value(&fields, "parent-us-tax-paid"), Some(token));
            assert_eq!(value(&fields, "parent-agi"), None);
        }
    }

    #[test]
    fn test_idempotent() {
        for doc_type in DocumentType::ALL {
            assert_eq!(extract_fields(FORM_1040, doc_type), extract_fields(FORM_1040, doc_type));
        }
    }

    #[test]
    fn test_type_isolation() {
        let fields = extract_fields(W2, DocumentType::Form1040);
        assert!(fields.iter().all(|f| f.source != "W-2"));
        assert!(!fields.iter().any(|f| f.label.starts_with("Box")));
    }

    #[test]
    fn test_confidence_bounds() {
        for doc_type in DocumentType::ALL {
            for field in extract_fields(FORM_1040, doc_type)
                .into_iter()
                .chain(extract_fields(W2, doc_type))
            {
                assert!((0.0..=1.0).contains(&field.confidence));
                assert_eq!((field.confidence * 100.0).round() / 100.0, field.confidence);
                assert!(!field.value.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_min_confidence_filter() {
        let fields = FieldEngine::new()
            .with_min_confidence(0.9)
            .extract(FORM_1040, DocumentType::Form1040);
        assert!(!fields.is_empty());
        assert!(fields.iter().all(|f| f.confidence >= 0.9));
        assert_eq!(value(&fields, "household-size"), None);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\tb   c "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[tokio::test]
    async fn test_concurrent_callers() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                tokio::task::spawn_blocking(move || {
                    let doc_type = if i % 2 == 0 { DocumentType::Form1040 } else { DocumentType::W2 };
                    let text = if i % 2 == 0 { FORM_1040 } else { W2 };
                    (doc_type, extract_fields(text, doc_type))
                })
            })
            .collect();

        for handle in handles {
            let (doc_type, fields) = handle.await.unwrap();
            let text = if doc_type == DocumentType::Form1040 { FORM_1040 } else { W2 };
            assert_eq!(fields, extract_fields(text, doc_type));
        }
    }
}
