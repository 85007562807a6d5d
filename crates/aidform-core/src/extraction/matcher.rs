//! Applies rule lists to normalized text.

use tracing::{debug, trace};

use super::FieldExtractor;
use super::rules::{HeuristicRule, rules_for, summary_rules};
use crate::models::document::DocumentType;
use crate::models::field::ExtractedField;

/// Run every rule in `rules` against `text`, tagging fields with `source`.
///
/// Each rule yields at most one field: its patterns are tried in order and
/// the first one whose capture survives normalization wins.
pub fn apply_rules(text: &str, rules: &[HeuristicRule], source: &str) -> Vec<ExtractedField> {
    rules
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| match_rule(text, rule, index, source))
        .collect()
}

fn match_rule(
    text: &str,
    rule: &HeuristicRule,
    index: usize,
    source: &str,
) -> Option<ExtractedField> {
    for (pattern_index, pattern) in rule.patterns.iter().enumerate() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };

        // Last non-empty group; leading groups only hold the label.
        let raw = (1..caps.len())
            .rev()
            .filter_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .find(|s| !s.is_empty());
        let Some(raw) = raw else {
            continue;
        };

        match rule.normalize(raw) {
            Some(value) => {
                debug!(
                    "{} matched '{}' via pattern {} ({})",
                    rule.question, value, pattern_index, source
                );
                return Some(ExtractedField::new(
                    rule.question.id(),
                    rule.label,
                    value,
                    rule.confidence_at(index),
                    source,
                ));
            }
            None => trace!("{} rejected capture '{}'", rule.question, raw),
        }
    }
    None
}

/// A static rule list bound to its source tag.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    rules: &'static [HeuristicRule],
    source: &'static str,
}

impl RuleSet {
    /// The summary rules, applied to every document.
    pub fn summary() -> Self {
        Self {
            rules: summary_rules(),
            source: "summary",
        }
    }

    /// Rules for one document type, tagged with its wire name.
    pub fn for_document(document_type: DocumentType) -> Self {
        Self {
            rules: rules_for(document_type),
            source: document_type.as_str(),
        }
    }

    pub fn rules(&self) -> &'static [HeuristicRule] {
        self.rules
    }

    /// Source tag as a static string, for listings that outlive the set.
    pub fn source_tag(&self) -> &'static str {
        self.source
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FieldExtractor for RuleSet {
    fn extract(&self, text: &str) -> Vec<ExtractedField> {
        apply_rules(text, self.rules, self.source)
    }

    fn source(&self) -> &str {
        self.source
    }
}
