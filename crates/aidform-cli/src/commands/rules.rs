//! Rules command - show which rules run for a document type.

use clap::Args;
use console::style;
use serde::Serialize;

use aidform_core::DocumentType;
use aidform_core::extraction::RuleSet;
use aidform_core::extraction::rules::{HeuristicRule, ValueTransform};

use super::extract::parse_doc_type;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Only list rules that apply to this document type
    #[arg(short = 't', long, value_parser = parse_doc_type)]
    doc_type: Option<DocumentType>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleRow {
    source: &'static str,
    question_id: &'static str,
    label: &'static str,
    confidence: f64,
    positional: bool,
    transform: Option<ValueTransform>,
    patterns: usize,
}

pub async fn run(args: RulesArgs) -> anyhow::Result<()> {
    let sets = rule_sets(args.doc_type);
    let rows: Vec<RuleRow> = sets.iter().flat_map(|set| rows_for(*set)).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut current = "";
    for row in &rows {
        if row.source != current {
            current = row.source;
            println!();
            println!("{}", style(format!("[{}]", current)).bold().cyan());
        }
        let confidence = if row.positional {
            format!("{:.2}*", row.confidence)
        } else {
            format!("{:.2}", row.confidence)
        };
        println!(
            "  {:<40} {:<24} {:>6}  {} pattern(s), {}",
            row.label,
            row.question_id,
            confidence,
            row.patterns,
            describe_transform(row.transform)
        );
    }
    println!();
    println!("{} * confidence derived from rule position", style("ℹ").blue());

    Ok(())
}

fn rule_sets(doc_type: Option<DocumentType>) -> Vec<RuleSet> {
    let mut sets = vec![RuleSet::summary()];
    match doc_type {
        Some(t) => sets.push(RuleSet::for_document(t)),
        None => sets.extend(DocumentType::ALL.into_iter().map(RuleSet::for_document)),
    }
    sets.retain(|set| !set.is_empty());
    sets
}

fn rows_for(set: RuleSet) -> Vec<RuleRow> {
    set.rules()
        .iter()
        .enumerate()
        .map(|(index, rule): (usize, &HeuristicRule)| RuleRow {
            source: set.source_tag(),
            question_id: rule.question.id(),
            label: rule.label,
            confidence: rule.confidence_at(index),
            positional: rule.confidence.is_none(),
            transform: rule.transform,
            patterns: rule.patterns.len(),
        })
        .collect()
}

fn describe_transform(transform: Option<ValueTransform>) -> String {
    match transform {
        Some(ValueTransform::Currency {
            min_digits,
            keep_decimal,
        }) => {
            let cents = if keep_decimal { ", cents" } else { "" };
            format!("currency (>= {} digits{})", min_digits, cents)
        }
        Some(ValueTransform::Ssn) => "ssn".to_string(),
        Some(ValueTransform::Name) => "name".to_string(),
        Some(ValueTransform::Date) => "date".to_string(),
        None => "text".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_type_lists_summary_first() {
        let sets = rule_sets(Some(DocumentType::W2));
        let sources: Vec<&str> = sets.iter().map(|s| s.source_tag()).collect();
        assert_eq!(sources, vec!["summary", "W-2"]);
    }

    #[test]
    fn test_other_adds_no_rules() {
        assert_eq!(rule_sets(Some(DocumentType::Other)).len(), 1);
    }

    #[test]
    fn test_rows_report_fixed_confidence() {
        let rows = rows_for(RuleSet::for_document(DocumentType::SsnLetter));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].confidence, 0.98);
        assert!(!rows[0].positional);
    }
}
