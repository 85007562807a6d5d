//! Declarative extraction rules and value normalizers.

pub mod catalog;
pub mod currency;
pub mod dates;
pub mod identity;
pub mod patterns;

pub use catalog::{rules_for, summary_rules};
pub use currency::{digit_count, looks_like_ssn_fragment, normalize_currency};
pub use dates::normalize_date;
pub use identity::{collapse_whitespace, normalize_name, normalize_ssn};

use regex::Regex;
use serde::Serialize;

use crate::models::question::Question;

/// Highest derived confidence, given to the first rule of a list.
pub const POSITIONAL_CONFIDENCE_START: f64 = 0.95;
/// Derived confidence lost per position in the rule list.
pub const POSITIONAL_CONFIDENCE_STEP: f64 = 0.1;
/// Derived confidence never drops below this.
pub const POSITIONAL_CONFIDENCE_FLOOR: f64 = 0.6;

/// Normalizer applied to a rule's raw capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueTransform {
    /// Dollar amount; see [`normalize_currency`].
    Currency { min_digits: usize, keep_decimal: bool },
    /// `###-##-####`.
    Ssn,
    /// Person name.
    Name,
    /// `MM/DD/YYYY`.
    Date,
}

impl ValueTransform {
    /// Whole-dollar amount with at least `min_digits` digits.
    pub const fn dollars(min_digits: usize) -> Self {
        ValueTransform::Currency {
            min_digits,
            keep_decimal: false,
        }
    }

    /// Amount that keeps its cents.
    pub const fn dollars_and_cents(min_digits: usize) -> Self {
        ValueTransform::Currency {
            min_digits,
            keep_decimal: true,
        }
    }

    /// Apply the normalizer; `None` means the capture is unusable.
    pub fn apply(&self, raw: &str) -> Option<String> {
        match *self {
            ValueTransform::Currency {
                min_digits,
                keep_decimal,
            } => normalize_currency(raw, min_digits, keep_decimal),
            ValueTransform::Ssn => normalize_ssn(raw),
            ValueTransform::Name => normalize_name(raw),
            ValueTransform::Date => normalize_date(raw),
        }
    }
}

/// A rule mapping text patterns to one question.
#[derive(Debug, Clone)]
pub struct HeuristicRule {
    /// Question answered by this rule.
    pub question: Question,
    /// Label attached to produced fields.
    pub label: &'static str,
    /// Tried in order; the first that yields a usable value wins.
    pub patterns: Vec<&'static Regex>,
    /// Normalizer; whitespace is collapsed when absent.
    pub transform: Option<ValueTransform>,
    /// Fixed confidence; derived from list position when absent.
    pub confidence: Option<f64>,
}

impl HeuristicRule {
    pub fn new(question: Question, label: &'static str, patterns: Vec<&'static Regex>) -> Self {
        Self {
            question,
            label,
            patterns,
            transform: None,
            confidence: None,
        }
    }

    pub fn with_transform(mut self, transform: ValueTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Normalize a raw capture with this rule's transform.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        match &self.transform {
            Some(transform) => transform.apply(raw),
            None => identity::non_empty(collapse_whitespace(raw)),
        }
    }

    /// Confidence for this rule sitting at `index` in its list.
    pub fn confidence_at(&self, index: usize) -> f64 {
        self.confidence.unwrap_or_else(|| positional_confidence(index))
    }
}

/// Earlier rules in a list are the more specific ones.
pub fn positional_confidence(index: usize) -> f64 {
    (POSITIONAL_CONFIDENCE_START - POSITIONAL_CONFIDENCE_STEP * index as f64)
        .max(POSITIONAL_CONFIDENCE_FLOOR)
}
