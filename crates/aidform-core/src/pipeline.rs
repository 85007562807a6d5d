//! Document pipeline: direct text first, OCR fallback for near-empty text.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extraction::{FieldEngine, merge_fields};
use crate::models::config::AidformConfig;
use crate::models::document::DocumentType;
use crate::models::field::ExtractedField;

/// Source prefix for fields found in recognized text.
pub const OCR_ORIGIN: &str = "ocr";

/// An external OCR collaborator.
///
/// Implementations turn the raw document bytes into text. Recognition
/// itself is out of scope for this crate.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in `data`.
    fn recognize(&self, data: &[u8]) -> Result<String>;
}

/// Outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    /// Direct text when present, otherwise the recognized text.
    pub text: String,
    /// Recognized text, when the fallback ran.
    pub ocr_text: Option<String>,
    /// Merged fields, highest confidence first.
    pub fields: Vec<ExtractedField>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs extraction over a document's text layers.
pub struct DocumentPipeline {
    config: AidformConfig,
    engine: FieldEngine,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl DocumentPipeline {
    pub fn new(config: AidformConfig) -> Self {
        let engine = FieldEngine::from_config(&config.extraction);
        Self {
            config,
            engine,
            recognizer: None,
        }
    }

    /// Use `recognizer` for the OCR fallback of [`Self::process_pdf`].
    pub fn with_recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn config(&self) -> &AidformConfig {
        &self.config
    }

    pub fn engine(&self) -> &FieldEngine {
        &self.engine
    }

    /// Whether `text` is too short to trust without an OCR pass.
    pub fn needs_ocr(&self, text: &str) -> bool {
        text.trim().chars().count() <= self.config.pdf.min_text_length
    }

    /// Extract from direct text, merging in `ocr` text when the direct
    /// text is near-empty.
    pub fn process_text(
        &self,
        text: &str,
        ocr: Option<&str>,
        document_type: DocumentType,
    ) -> ProcessedDocument {
        let start = Instant::now();
        let fields = self.extract_layers(text, ocr, document_type);

        if !self.needs_ocr(text) {
            return ProcessedDocument {
                text: text.to_string(),
                ocr_text: None,
                fields,
                processing_time_ms: start.elapsed().as_millis() as u64,
            };
        }

        let reported = if text.trim().is_empty() {
            ocr.unwrap_or_default()
        } else {
            text
        };

        ProcessedDocument {
            text: reported.to_string(),
            ocr_text: ocr.map(str::to_string),
            fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Fields from the direct text, merged with fields from `ocr` when the
    /// direct text is near-empty. Does no timing, so it is safe on wasm.
    pub fn extract_layers(
        &self,
        text: &str,
        ocr: Option<&str>,
        document_type: DocumentType,
    ) -> Vec<ExtractedField> {
        let direct = self.engine.extract(text, document_type);

        if !self.needs_ocr(text) {
            debug!("Direct text is long enough, skipping OCR fields");
            return direct;
        }

        let recognized: Vec<ExtractedField> = self
            .engine
            .extract(ocr.unwrap_or_default(), document_type)
            .into_iter()
            .map(|f| f.with_origin(OCR_ORIGIN))
            .collect();
        info!(
            "OCR fallback: {} direct fields, {} recognized fields",
            direct.len(),
            recognized.len()
        );

        merge_fields(direct.into_iter().chain(recognized))
    }

    /// Read the text layer of a PDF and extract from it, running the
    /// recognizer when the text layer is near-empty.
    ///
    /// PDF and recognizer failures are logged and treated as empty text.
    #[cfg(feature = "native")]
    pub fn process_pdf(&self, data: &[u8], document_type: DocumentType) -> ProcessedDocument {
        use crate::pdf::PdfExtractor;

        let start = Instant::now();
        let text = match PdfExtractor::new()
            .with_max_pages(self.config.pdf.max_pages)
            .read(data)
        {
            Ok(content) => {
                if content.is_truncated() {
                    debug!(
                        "Read {} of {} pages",
                        content.pages_read, content.page_count
                    );
                }
                content.text
            }
            Err(e) => {
                warn!("PDF text extraction failed, falling back to OCR only: {}", e);
                String::new()
            }
        };

        let ocr_text = if self.needs_ocr(&text) {
            self.recognize(data)
        } else {
            None
        };

        let mut processed = self.process_text(&text, ocr_text.as_deref(), document_type);
        processed.processing_time_ms = start.elapsed().as_millis() as u64;
        processed
    }

    #[cfg(feature = "native")]
    fn recognize(&self, data: &[u8]) -> Option<String> {
        let recognizer = match self.recognizer.as_ref() {
            Some(r) => r,
            None => {
                debug!("No text recognizer configured");
                return None;
            }
        };
        match recognizer.recognize(data) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("OCR failed: {}", e);
                Some(String::new())
            }
        }
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new(AidformConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AidformError;
    use pretty_assertions::assert_eq;

    const LONG_TEXT: &str = "Student Name: Alex Q. Doe Student SSN: 123 45 6789 DOB: 1/2/2003";

    struct FixedRecognizer(&'static str);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _data: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _data: &[u8]) -> Result<String> {
            Err(AidformError::Ocr("engine unavailable".to_string()))
        }
    }

    #[test]
    fn test_long_text_skips_ocr() {
        let pipeline = DocumentPipeline::default();
        let result = pipeline.process_text(LONG_TEXT, Some("Household Size: 4"), DocumentType::Other);
        assert_eq!(result.ocr_text, None);
        assert_eq!(result.fields.len(), 3);
        assert!(result.fields.iter().all(|f| f.source == "summary"));
    }

    #[test]
    fn test_short_text_merges_ocr() {
        let pipeline = DocumentPipeline::default();
        let result = pipeline.process_text(
            "Household Size: 4",
            Some("Household Size: 4 Number in College: 2"),
            DocumentType::Other,
        );

        assert_eq!(result.text, "Household Size: 4");
        let sources: Vec<(&str, &str)> = result
            .fields
            .iter()
            .map(|f| (f.question_id.as_str(), f.source.as_str()))
            .collect();
        // The duplicate household size keeps the direct-text entry.
        assert_eq!(
            sources,
            vec![("household-size", "summary"), ("number-in-college", "ocr/summary")]
        );
    }

    #[test]
    fn test_empty_text_reports_ocr_text() {
        let pipeline = DocumentPipeline::default();
        let result = pipeline.process_text("", Some("DOB: 01022003"), DocumentType::Other);
        assert_eq!(result.text, "DOB: 01022003");
        assert_eq!(result.ocr_text.as_deref(), Some("DOB: 01022003"));
        assert_eq!(result.fields[0].value, "01/02/2003");
        assert_eq!(result.fields[0].source, "ocr/summary");
    }

    #[test]
    fn test_min_confidence_applies_to_both_passes() {
        let mut config = AidformConfig::default();
        config.extraction.min_confidence = 0.8;
        let pipeline = DocumentPipeline::new(config);
        let result = pipeline.process_text("", Some("Household Size: 4 DOB: 1/2/2003"), DocumentType::Other);
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.fields[0].question_id, "student-dob");
    }

    #[test]
    #[cfg(feature = "native")]
    fn test_invalid_pdf_uses_recognizer() {
        let pipeline = DocumentPipeline::default()
            .with_recognizer(Box::new(FixedRecognizer("Student SSN: 123-45-6789")));
        let result = pipeline.process_pdf(b"%PDF-garbage", DocumentType::Other);
        assert_eq!(result.text, "Student SSN: 123-45-6789");
        assert_eq!(result.fields[0].value, "123-45-6789");
        assert_eq!(result.fields[0].source, "ocr/summary");
    }

    #[test]
    #[cfg(feature = "native")]
    fn test_failing_recognizer_degrades() {
        let pipeline = DocumentPipeline::default().with_recognizer(Box::new(FailingRecognizer));
        let result = pipeline.process_pdf(b"not a pdf", DocumentType::W2);
        assert!(result.fields.is_empty());
        assert_eq!(result.ocr_text.as_deref(), Some(""));
    }

    #[test]
    #[cfg(feature = "native")]
    fn test_no_recognizer() {
        let result = DocumentPipeline::default().process_pdf(b"", DocumentType::Other);
        assert!(result.fields.is_empty());
        assert_eq!(result.ocr_text, None);
        assert_eq!(result.text, "");
    }
}
