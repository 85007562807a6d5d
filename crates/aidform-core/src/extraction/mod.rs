//! Field extraction from recovered document text.

pub mod blocks;
mod engine;
mod matcher;
mod merge;
pub mod rules;

pub use blocks::{BlockCandidate, IncomeBlockDetector, Rejection, TaxBlockDetector};
pub use engine::{FieldEngine, extract_fields, normalize_whitespace};
pub use matcher::{RuleSet, apply_rules};
pub use merge::merge_fields;

use crate::models::field::ExtractedField;

/// One extraction pass over normalized text.
pub trait FieldExtractor {
    /// Candidate fields found in `text`.
    fn extract(&self, text: &str) -> Vec<ExtractedField>;

    /// Provenance tag carried by produced fields.
    fn source(&self) -> &str;
}
