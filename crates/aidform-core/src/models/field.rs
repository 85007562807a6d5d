//! Extracted field records.

use serde::{Deserialize, Serialize};

/// Confidence used when a producer hands us a non-finite score.
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

/// One candidate answer to a financial-aid question.
///
/// Deserialized fields go through [`ExtractedField::new`], so their
/// confidence is clamped like locally produced ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawExtractedField")]
pub struct ExtractedField {
    /// Question this candidate answers (e.g. `parent-agi`).
    pub question_id: String,
    /// What was matched.
    pub label: String,
    /// Normalized, never empty.
    pub value: String,
    /// Score in [0, 1] with at most two decimals.
    pub confidence: f64,
    /// Which rule group or pass produced the field.
    pub source: String,
}

impl ExtractedField {
    /// Build a field, clamping the confidence.
    pub fn new(
        question_id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
        confidence: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            label: label.into(),
            value: value.into(),
            confidence: clamp_confidence(confidence),
            source: source.into(),
        }
    }

    /// Prefix the source tag, e.g. `ocr/summary` for an OCR pass.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.source = format!("{}/{}", origin, self.source);
        self
    }
}

/// Wire form of a field supplied by another pass or a client.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExtractedField {
    question_id: String,
    #[serde(default)]
    label: String,
    value: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    source: String,
}

impl From<RawExtractedField> for ExtractedField {
    fn from(raw: RawExtractedField) -> Self {
        ExtractedField::new(
            raw.question_id,
            raw.label,
            raw.value,
            raw.confidence.unwrap_or(FALLBACK_CONFIDENCE),
            raw.source,
        )
    }
}

/// Clamp a score into [0, 1] and round it to two decimals.
pub fn clamp_confidence(value: f64) -> f64 {
    if !value.is_finite() {
        return FALLBACK_CONFIDENCE;
    }
    if value < 0.0 {
        return 0.0;
    }
    if value > 1.0 {
        return 1.0;
    }
    (value * 100.0).round() / 100.0
}
