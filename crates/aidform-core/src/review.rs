//! Review helpers over a merged field set: gaps, conflicts, hints.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::config::ReviewConfig;
use crate::models::field::ExtractedField;
use crate::models::question::{FieldCategory, Question};

/// AGI below this suggests need-based aid eligibility.
const NEED_BASED_AGI_THRESHOLD: f64 = 65_000.0;

/// Required questions an application still lacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingFields {
    pub category: FieldCategory,
    pub items: Vec<String>,
}

/// What a reviewer should look at before using the fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub missing: Vec<MissingFields>,
    /// `label: v1 vs v2` for questions with several distinct values.
    pub conflicts: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostics {
    /// Full diagnostics for a merged field set.
    pub fn build(fields: &[ExtractedField]) -> Self {
        Self::build_with(fields, &ReviewConfig::default())
    }

    pub fn build_with(fields: &[ExtractedField], config: &ReviewConfig) -> Self {
        let labels = label_map(fields);

        let missing = if config.report_missing {
            find_missing(fields, &labels)
        } else {
            Vec::new()
        };
        let conflicts = if config.report_conflicts {
            find_conflicts(fields, &labels)
        } else {
            Vec::new()
        };

        let mut diagnostics = Self {
            missing,
            conflicts,
            suggestions: Vec::new(),
        };
        diagnostics.suggestions = suggestions(fields, &diagnostics);
        diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.conflicts.is_empty()
    }
}

/// Last label seen per question id.
fn label_map(fields: &[ExtractedField]) -> HashMap<&str, &str> {
    fields
        .iter()
        .map(|f| (f.question_id.as_str(), f.label.as_str()))
        .collect()
}

fn category_of(question_id: &str) -> FieldCategory {
    Question::parse(question_id)
        .map(|q| q.category())
        .unwrap_or(FieldCategory::Other)
}

fn find_missing(fields: &[ExtractedField], labels: &HashMap<&str, &str>) -> Vec<MissingFields> {
    [FieldCategory::FederalAid, FieldCategory::CssProfile]
        .into_iter()
        .filter_map(|category| {
            // Any field counts toward Federal Aid; CSS Profile only counts its own.
            let present: Vec<&str> = fields
                .iter()
                .filter(|f| {
                    category == FieldCategory::FederalAid || category_of(&f.question_id) == category
                })
                .map(|f| f.question_id.as_str())
                .collect();

            let items: Vec<String> = category
                .required()
                .iter()
                .filter(|q| !present.contains(&q.id()))
                .map(|q| labels.get(q.id()).copied().unwrap_or(q.id()).to_string())
                .collect();

            if items.is_empty() {
                None
            } else {
                Some(MissingFields { category, items })
            }
        })
        .collect()
}

fn find_conflicts(fields: &[ExtractedField], labels: &HashMap<&str, &str>) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut values: HashMap<&str, Vec<&str>> = HashMap::new();
    for field in fields {
        let entry = values.entry(field.question_id.as_str()).or_insert_with(|| {
            order.push(field.question_id.as_str());
            Vec::new()
        });
        if !entry.contains(&field.value.as_str()) {
            entry.push(field.value.as_str());
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let distinct = &values[id];
            if distinct.len() < 2 {
                return None;
            }
            let label = labels.get(id).copied().unwrap_or(id);
            Some(format!("{}: {}", label, distinct.join(" vs ")))
        })
        .collect()
}

fn amount(fields: &[ExtractedField], question: Question) -> Option<f64> {
    let value = &best_for(fields, question)?.value;
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn suggestions(fields: &[ExtractedField], diagnostics: &Diagnostics) -> Vec<String> {
    let agi = amount(fields, Question::ParentAgi);
    let wages = amount(fields, Question::ParentWages);
    let tax = amount(fields, Question::ParentUsTaxPaid);
    let untaxed = amount(fields, Question::ParentUntaxedIncome);

    let mut ideas = Vec::new();
    if agi.is_some_and(|agi| agi < NEED_BASED_AGI_THRESHOLD) {
        ideas.push(
            "Income suggests need-based aid eligibility: file federal aid forms early and apply to need-aware scholarships."
                .to_string(),
        );
    }
    if wages.is_some() && tax.is_none() {
        ideas.push(
            "Total tax missing: double-check 1040 lines 22/24 or W-2 Box 2 before submission."
                .to_string(),
        );
    }
    if untaxed.is_some() {
        ideas.push(
            "Untaxed income present: CSS Profile will ask for details, keep statements handy."
                .to_string(),
        );
    }
    if !diagnostics.conflicts.is_empty() {
        ideas.push("Resolve conflicting values before filing to avoid verification delays.".to_string());
    }
    for missing in &diagnostics.missing {
        let idea = format!("Fill missing {} fields: {}", missing.category, missing.items.join(", "));
        if !ideas.contains(&idea) {
            ideas.push(idea);
        }
    }
    ideas
}

fn best_for(fields: &[ExtractedField], question: Question) -> Option<&ExtractedField> {
    fields.iter().find(|f| f.question_id == question.id())
}

/// The preferred field per question: the first one in merged order.
pub fn best_per_question(fields: &[ExtractedField]) -> Vec<&ExtractedField> {
    let mut seen: Vec<&str> = Vec::new();
    fields
        .iter()
        .filter(|f| {
            if seen.contains(&f.question_id.as_str()) {
                false
            } else {
                seen.push(f.question_id.as_str());
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(question: Question, label: &str, value: &str, confidence: f64) -> ExtractedField {
        ExtractedField::new(question.id(), label, value, confidence, "summary")
    }

    fn complete_set() -> Vec<ExtractedField> {
        vec![
            field(Question::StudentLegalName, "Name", "Alex Q. Doe", 0.95),
            field(Question::StudentSsn, "SSN", "123-45-6789", 0.95),
            field(Question::StudentDob, "DOB", "01/02/2003", 0.9),
            field(Question::ParentAgi, "AGI", "70000", 0.95),
            field(Question::ParentWages, "Wages", "65000", 0.9),
            field(Question::ParentUsTaxPaid, "Tax", "5000", 0.92),
            field(Question::ParentUntaxedIncome, "Untaxed", "500", 0.85),
            field(Question::HouseholdSize, "Household", "4", 0.7),
            field(Question::NumberInCollege, "College", "1", 0.7),
        ]
    }

    #[test]
    fn test_missing_by_category() {
        let fields = vec![
            field(Question::ParentAgi, "AGI", "50987", 0.95),
            field(Question::HouseholdSize, "Household size", "4", 0.7),
        ];
        let diagnostics = Diagnostics::build(&fields);

        assert_eq!(diagnostics.missing.len(), 2);
        assert_eq!(diagnostics.missing[0].category, FieldCategory::FederalAid);
        assert_eq!(
            diagnostics.missing[0].items,
            vec![
                "parent-wages",
                "parent-us-tax-paid",
                "number-in-college",
                "student-ssn",
                "student-dob",
                "student-legal-name",
            ]
        );

        // Both present questions are Federal Aid ones, so CSS Profile
        // still reports them, by label.
        let css = &diagnostics.missing[1];
        assert_eq!(css.category, FieldCategory::CssProfile);
        assert!(css.items.contains(&"AGI".to_string()));
        assert!(css.items.contains(&"Household size".to_string()));
        assert!(css.items.contains(&"parent-untaxed-income".to_string()));
    }

    #[test]
    fn test_conflicts_listed_by_label() {
        let fields = vec![
            field(Question::ParentUsTaxPaid, "Total tax (1040)", "4395", 0.92),
            field(Question::ParentUsTaxPaid, "Total tax (1040)", "876", 0.8),
            field(Question::ParentAgi, "AGI", "50987", 0.95),
            field(Question::ParentAgi, "AGI", "50987", 0.85),
        ];
        let diagnostics = Diagnostics::build(&fields);
        assert_eq!(diagnostics.conflicts, vec!["Total tax (1040): 4395 vs 876"]);
    }

    #[test]
    fn test_config_disables_reports() {
        let fields = vec![
            field(Question::ParentAgi, "AGI", "1000", 0.95),
            field(Question::ParentAgi, "AGI", "2000", 0.9),
        ];
        let config = ReviewConfig {
            report_conflicts: false,
            report_missing: false,
        };
        let diagnostics = Diagnostics::build_with(&fields, &config);
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn test_suggestions() {
        let fields = vec![
            field(Question::ParentAgi, "AGI", "50987", 0.95),
            field(Question::ParentWages, "Wages", "45123", 0.9),
        ];
        let diagnostics = Diagnostics::build(&fields);
        assert!(diagnostics.suggestions[0].starts_with("Income suggests need-based"));
        assert!(diagnostics.suggestions[1].starts_with("Total tax missing"));
        assert!(
            diagnostics
                .suggestions
                .iter()
                .any(|s| s.starts_with("Fill missing Federal Aid fields"))
        );
    }

    #[test]
    fn test_complete_set_satisfies_federal_aid() {
        let diagnostics = Diagnostics::build(&complete_set());
        assert!(diagnostics.missing.iter().all(|m| m.category == FieldCategory::CssProfile));
        assert!(diagnostics.conflicts.is_empty());
    }

    #[test]
    fn test_best_per_question() {
        let fields = vec![
            field(Question::ParentUsTaxPaid, "Tax", "4395", 0.92),
            field(Question::ParentAgi, "AGI", "50987", 0.9),
            field(Question::ParentUsTaxPaid, "Tax", "876", 0.8),
        ];
        let best: Vec<&str> = best_per_question(&fields)
            .into_iter()
            .map(|f| f.value.as_str())
            .collect();
        assert_eq!(best, vec!["4395", "50987"]);
    }
}
