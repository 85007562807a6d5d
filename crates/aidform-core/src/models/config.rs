//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::models::document::DocumentType;

/// Main configuration for the aidform pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AidformConfig {
    /// PDF intake configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Review/diagnostics configuration.
    pub review: ReviewConfig,
}

/// PDF intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read text from (0 = unlimited).
    pub max_pages: usize,

    /// Direct text at or below this many characters triggers the OCR fallback.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            min_text_length: 40,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Drop fields scoring below this confidence.
    pub min_confidence: f64,

    /// Run the 1040 numeric block heuristics.
    pub block_detection: bool,

    /// Guess the document type from the file name when none is given.
    pub infer_document_type: bool,

    /// Type used when nothing is declared and inference is off.
    pub default_document_type: DocumentType,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            block_detection: true,
            infer_document_type: true,
            default_document_type: DocumentType::Other,
        }
    }
}

/// Review/diagnostics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Report questions answered with more than one distinct value.
    pub report_conflicts: bool,

    /// Report required questions without any candidate.
    pub report_missing: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            report_conflicts: true,
            report_missing: true,
        }
    }
}

impl AidformConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Access {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Invalid {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Access {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.extraction.min_confidence;
        if !(0.0..=1.0).contains(&min) {
            return Err(ConfigError::OutOfRange {
                key: "extraction.min_confidence".to_string(),
                value: min.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the document type for an input, honoring inference settings.
    pub fn resolve_document_type(
        &self,
        declared: Option<DocumentType>,
        file_name: Option<&str>,
    ) -> DocumentType {
        if let Some(doc_type) = declared {
            return doc_type;
        }
        match file_name {
            Some(name) if self.extraction.infer_document_type => {
                DocumentType::infer_from_filename(name)
            }
            _ => self.extraction.default_document_type,
        }
    }
}
