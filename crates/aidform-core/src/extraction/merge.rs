//! Combining field sets from several extraction passes.

use std::collections::HashMap;

use crate::models::field::ExtractedField;

/// Merge field sets, deduplicating on `(question_id, value)`.
///
/// Fields with a blank value are dropped.
/// An exact duplicate replaces the kept entry only with a strictly higher
/// confidence, so ties keep the earlier one. Different values for the same
/// question all survive. The result is ordered by confidence, highest
/// first, with first-seen order breaking ties.
pub fn merge_fields<I>(fields: I) -> Vec<ExtractedField>
where
    I: IntoIterator<Item = ExtractedField>,
{
    let mut merged: Vec<ExtractedField> = Vec::new();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for field in fields {
        if field.value.trim().is_empty() {
            continue;
        }
        let key = (field.question_id.clone(), field.value.clone());
        match positions.get(&key) {
            Some(&at) => {
                if field.confidence > merged[at].confidence {
                    merged[at] = field;
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(field);
            }
        }
    }

    // Stable sort; confidences are clamped, so never NaN.
    merged.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(question: &str, value: &str, confidence: f64, source: &str) -> ExtractedField {
        ExtractedField::new(question, question, value, confidence, source)
    }

    #[test]
    fn test_duplicate_keeps_higher_confidence() {
        let merged = merge_fields(vec![
            field("parent-wages", "34000", 0.8, "summary"),
            field("parent-wages", "34000", 0.9, "W-2"),
        ]);
        assert_eq!(merged, vec![field("parent-wages", "34000", 0.9, "W-2")]);
    }

    #[test]
    fn test_tie_keeps_first() {
        let merged = merge_fields(vec![
            field("household-size", "4", 0.7, "summary"),
            field("household-size", "4", 0.7, "ocr/summary"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "summary");
    }

    #[test]
    fn test_distinct_values_survive_in_confidence_order() {
        let merged = merge_fields(vec![
            field("parent-us-tax-paid", "876", 0.8, "summary"),
            field("parent-us-tax-paid", "4395", 0.92, "1040"),
            field("household-size", "4", 0.7, "summary"),
        ]);
        let values: Vec<&str> = merged.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["4395", "876", "4"]);
    }

    #[test]
    fn test_equal_confidence_keeps_input_order() {
        let merged = merge_fields(vec![
            field("parent-agi", "1", 0.9, "a"),
            field("parent-wages", "2", 0.9, "b"),
            field("student-ssn", "3", 0.95, "c"),
        ]);
        let sources: Vec<&str> = merged.iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_merge_is_stable_under_remerge() {
        let once = merge_fields(vec![
            field("parent-agi", "50987", 0.95, "1040"),
            field("parent-agi", "50987", 0.85, "summary"),
            field("parent-agi", "49550", 0.93, "1040"),
        ]);
        let twice = merge_fields(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_client_fields_are_clamped_and_blank_values_dropped() {
        let incoming: Vec<ExtractedField> = serde_json::from_str(
            r#"[
                {"questionId":"parent-agi","label":"AGI","value":"  ","confidence":7.456,"source":"client"},
                {"questionId":"parent-agi","label":"AGI","value":"50987","confidence":7.456,"source":"client"}
            ]"#,
        )
        .unwrap();
        let merged = merge_fields(incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].value, "50987");
        assert_eq!(merged[0].confidence, 1.0);
    }

    #[test]
    fn test_empty() {
        assert!(merge_fields(Vec::new()).is_empty());
    }
}
