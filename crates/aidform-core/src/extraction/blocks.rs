//! Positional heuristics for the dense numeric tables of Form 1040.
//!
//! Text recovered from a 1040 often loses its line labels, leaving the
//! income and tax sections as long runs of bare amounts. The detectors here
//! find those runs and read fields off fixed offsets, after filtering out
//! runs that are not plausibly a household's income figures.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::FieldExtractor;
use super::rules::{digit_count, looks_like_ssn_fragment, normalize_currency};
use crate::models::document::DocumentType;
use crate::models::field::ExtractedField;
use crate::models::question::Question;

/// A numeric token: three or more digits/commas, optionally signed or
/// parenthesized, or a bare zero.
const NUMERIC_TOKEN: &str = r"-?\(?[0-9][0-9,]{2,}\)?|0";

/// Amounts in a block must carry at least this many digits.
pub const BLOCK_MIN_DIGITS: usize = 3;

pub const INCOME_RUN_MIN: usize = 6;
pub const INCOME_RUN_MAX: usize = 20;
/// Anything longer is an identifier, not an amount.
pub const INCOME_MAX_VALUE_DIGITS: usize = 6;
/// Fewer surviving values than this and the run is discarded.
pub const INCOME_MIN_VALUES: usize = 6;
pub const INCOME_MAX_ABS_VALUE: i64 = 150_000;
/// A real income block holds at least one value in this range.
pub const INCOME_ANCHOR_MIN: i64 = 30_000;
pub const INCOME_ANCHOR_MAX: i64 = 90_000;
pub const INCOME_WAGES_INDEX: usize = 0;
pub const INCOME_AGI_INDEX: usize = 5;
pub const INCOME_WAGES_CONFIDENCE: f64 = 0.9;
pub const INCOME_AGI_CONFIDENCE: f64 = 0.93;

pub const TAX_RUN_MIN: usize = 8;
pub const TAX_RUN_MAX: usize = 25;
pub const TAX_PRIMARY_INDEX: usize = 7;
pub const TAX_FALLBACK_INDEX: usize = 5;
pub const TAX_PRIMARY_CONFIDENCE: f64 = 0.84;
pub const TAX_FALLBACK_CONFIDENCE: f64 = 0.8;

const BLOCK_SOURCE: &str = "1040";

lazy_static! {
    static ref TOKEN: Regex = Regex::new(NUMERIC_TOKEN).unwrap();

    static ref INCOME_RUN: Regex = Regex::new(&format!(
        r"(?:(?:{})\s+){{{},{}}}",
        NUMERIC_TOKEN, INCOME_RUN_MIN, INCOME_RUN_MAX
    ))
    .unwrap();

    static ref TAX_RUN: Regex = Regex::new(&format!(
        r"(?:(?:{})\s+){{{},{}}}",
        NUMERIC_TOKEN, TAX_RUN_MIN, TAX_RUN_MAX
    ))
    .unwrap();
}

/// Why an income run was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Some value is larger than any plausible household income line.
    ValueTooLarge,
    /// No value falls in the income anchor range.
    NoIncomeAnchor,
    /// Too few values survived cleaning.
    TooFewValues,
}

/// A numeric run considered by one of the detectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCandidate {
    /// The run as it appears in the text.
    pub raw: String,
    /// Tokens found in the run before cleaning.
    pub tokens: Vec<String>,
    /// Normalized amounts that survived filtering.
    pub values: Vec<String>,
    /// Sum of absolute values.
    pub sum: Decimal,
    /// Set when the run was rejected.
    pub rejection: Option<Rejection>,
}

impl BlockCandidate {
    fn is_plausible(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Candidate runs for the given pattern, in text order.
fn numeric_runs(pattern: &Regex, text: &str) -> Vec<(String, Vec<String>)> {
    pattern
        .find_iter(text)
        .map(|run| {
            let tokens = TOKEN
                .find_iter(run.as_str())
                .map(|t| t.as_str().to_string())
                .collect();
            (run.as_str().to_string(), tokens)
        })
        .collect()
}

/// Sum of absolute values, saturating at `Decimal::MAX`.
fn abs_sum(values: &[String]) -> Decimal {
    values
        .iter()
        .filter_map(|v| Decimal::from_str(v).ok())
        .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(d.abs()))
        .unwrap_or(Decimal::MAX)
}

/// Finds the wages/AGI block among the numeric runs of a 1040.
#[derive(Debug, Clone, Default)]
pub struct IncomeBlockDetector;

impl IncomeBlockDetector {
    pub fn new() -> Self {
        Self
    }

    /// Every run the detector looked at, with its verdict.
    pub fn candidates(&self, text: &str) -> Vec<BlockCandidate> {
        numeric_runs(&INCOME_RUN, text)
            .into_iter()
            .map(|(raw, tokens)| self.score(raw, tokens))
            .collect()
    }

    fn score(&self, raw: String, tokens: Vec<String>) -> BlockCandidate {
        let values: Vec<String> = tokens
            .iter()
            .filter_map(|t| normalize_currency(t, BLOCK_MIN_DIGITS, false))
            .filter(|v| !looks_like_ssn_fragment(v))
            .filter(|v| digit_count(v) <= INCOME_MAX_VALUE_DIGITS)
            .collect();

        let amounts: Vec<Decimal> = values
            .iter()
            .filter_map(|v| Decimal::from_str(v).ok())
            .map(|d| d.abs())
            .collect();
        let max_allowed = Decimal::from(INCOME_MAX_ABS_VALUE);
        let anchor = Decimal::from(INCOME_ANCHOR_MIN)..=Decimal::from(INCOME_ANCHOR_MAX);

        let rejection = if amounts.iter().any(|a| *a > max_allowed) {
            Some(Rejection::ValueTooLarge)
        } else if !amounts.iter().any(|a| anchor.contains(a)) {
            Some(Rejection::NoIncomeAnchor)
        } else if values.len() < INCOME_MIN_VALUES {
            Some(Rejection::TooFewValues)
        } else {
            None
        };

        let sum = abs_sum(&values);
        BlockCandidate {
            raw,
            tokens,
            values,
            sum,
            rejection,
        }
    }

    /// The plausible run with the largest sum; the earliest wins a tie.
    pub fn best(&self, text: &str) -> Option<BlockCandidate> {
        self.candidates(text)
            .into_iter()
            .filter(BlockCandidate::is_plausible)
            .fold(None, |best: Option<BlockCandidate>, candidate| match best {
                Some(current) if candidate.sum <= current.sum => Some(current),
                _ => Some(candidate),
            })
    }
}

impl FieldExtractor for IncomeBlockDetector {
    fn extract(&self, text: &str) -> Vec<ExtractedField> {
        let Some(block) = self.best(text) else {
            debug!("No plausible income block");
            return Vec::new();
        };
        debug!("Income block chosen: {:?} (sum {})", block.values, block.sum);

        let mut fields = Vec::new();
        if let Some(wages) = block.values.get(INCOME_WAGES_INDEX) {
            fields.push(ExtractedField::new(
                Question::ParentWages.id(),
                "Parent wages, salaries, tips",
                wages.as_str(),
                INCOME_WAGES_CONFIDENCE,
                BLOCK_SOURCE,
            ));
        }
        if let Some(agi) = block.values.get(INCOME_AGI_INDEX) {
            fields.push(ExtractedField::new(
                Question::ParentAgi.id(),
                "Adjusted Gross Income (1040 line 11)",
                agi.as_str(),
                INCOME_AGI_CONFIDENCE,
                BLOCK_SOURCE,
            ));
        }
        fields
    }

    fn source(&self) -> &str {
        BLOCK_SOURCE
    }
}

/// Reads total tax off the longest numeric run of a 1040.
#[derive(Debug, Clone, Default)]
pub struct TaxBlockDetector;

impl TaxBlockDetector {
    pub fn new() -> Self {
        Self
    }

    /// Every run the detector looked at. None is ever rejected; the longest
    /// one is used.
    pub fn candidates(&self, text: &str) -> Vec<BlockCandidate> {
        numeric_runs(&TAX_RUN, text)
            .into_iter()
            .map(|(raw, tokens)| {
                let values: Vec<String> = tokens
                    .iter()
                    .filter_map(|t| normalize_currency(t, BLOCK_MIN_DIGITS, false))
                    .filter(|v| !looks_like_ssn_fragment(v))
                    .collect();
                let sum = abs_sum(&values);
                BlockCandidate {
                    raw,
                    tokens,
                    values,
                    sum,
                    rejection: None,
                }
            })
            .collect()
    }

    /// The run with the most raw tokens; the earliest wins a tie.
    pub fn best(&self, text: &str) -> Option<BlockCandidate> {
        self.candidates(text)
            .into_iter()
            .fold(None, |best: Option<BlockCandidate>, candidate| match best {
                Some(current) if candidate.tokens.len() <= current.tokens.len() => Some(current),
                _ => Some(candidate),
            })
    }
}

impl FieldExtractor for TaxBlockDetector {
    fn extract(&self, text: &str) -> Vec<ExtractedField> {
        let Some(block) = self.best(text) else {
            return Vec::new();
        };

        let picked = block
            .values
            .get(TAX_PRIMARY_INDEX)
            .map(|v| (v, TAX_PRIMARY_CONFIDENCE))
            .or_else(|| {
                block
                    .values
                    .get(TAX_FALLBACK_INDEX)
                    .map(|v| (v, TAX_FALLBACK_CONFIDENCE))
            });

        match picked {
            Some((value, confidence)) => {
                debug!("Tax block value {} at confidence {}", value, confidence);
                vec![ExtractedField::new(
                    Question::ParentUsTaxPaid.id(),
                    "Total tax (1040)",
                    value.as_str(),
                    confidence,
                    BLOCK_SOURCE,
                )]
            }
            None => {
                debug!("Tax block too short: {} values", block.values.len());
                Vec::new()
            }
        }
    }

    fn source(&self) -> &str {
        BLOCK_SOURCE
    }
}

/// Whether the block detectors apply to a document type.
pub fn applies_to(document_type: DocumentType) -> bool {
    document_type.is_tabular()
}
