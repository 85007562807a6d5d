//! WASM bindings for financial-aid document field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! PDF reading and OCR happen on the JS side; these bindings take the
//! recovered text.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use aidform_core::extraction::rules;
use aidform_core::{AidformConfig, Diagnostics, DocumentPipeline, DocumentType, ExtractedField};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn fields_from_js(fields: JsValue) -> Result<Vec<ExtractedField>, JsValue> {
    serde_wasm_bindgen::from_value(fields).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract candidate fields from document text.
///
/// `document_type` is a wire name such as `"1040"` or `"W-2"`; anything
/// unrecognized is treated as `"Other"`.
#[wasm_bindgen(js_name = extractFields)]
pub fn extract_fields(text: &str, document_type: Option<String>) -> Result<JsValue, JsValue> {
    let doc_type = DocumentType::from_declared(document_type.as_deref());
    to_js(&aidform_core::extract_fields(text, doc_type))
}

/// Same as [`extract_fields`] but returns a JSON string.
#[wasm_bindgen(js_name = extractFieldsJson)]
pub fn extract_fields_json(text: &str, document_type: Option<String>) -> Result<String, JsValue> {
    let doc_type = DocumentType::from_declared(document_type.as_deref());
    serde_json::to_string(&aidform_core::extract_fields(text, doc_type))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Merge the field arrays of two passes into one ranked list.
#[wasm_bindgen(js_name = mergeFields)]
pub fn merge_fields(a: JsValue, b: JsValue) -> Result<JsValue, JsValue> {
    let a = fields_from_js(a)?;
    let b = fields_from_js(b)?;
    to_js(&aidform_core::merge_fields(a.into_iter().chain(b)))
}

/// Missing fields, conflicts and suggestions for a merged field array.
#[wasm_bindgen(js_name = buildDiagnostics)]
pub fn build_diagnostics(fields: JsValue) -> Result<JsValue, JsValue> {
    let fields = fields_from_js(fields)?;
    to_js(&Diagnostics::build(&fields))
}

#[derive(Serialize)]
struct DocumentTypeOption {
    value: &'static str,
    label: &'static str,
}

/// Supported document types as `{ value, label }` pairs.
#[wasm_bindgen(js_name = documentTypes)]
pub fn document_types() -> Result<JsValue, JsValue> {
    let options: Vec<DocumentTypeOption> = DocumentType::ALL
        .iter()
        .map(|t| DocumentTypeOption {
            value: t.as_str(),
            label: t.label(),
        })
        .collect();
    to_js(&options)
}

/// Guess a document type from an upload's file name.
#[wasm_bindgen(js_name = inferDocumentType)]
pub fn infer_document_type(file_name: &str) -> String {
    DocumentType::infer_from_filename(file_name).as_str().to_string()
}

/// Format an SSN as `###-##-####`.
#[wasm_bindgen(js_name = normalizeSsn)]
pub fn normalize_ssn(value: &str) -> Option<String> {
    rules::normalize_ssn(value)
}

/// Clean a dollar amount; parentheses mean negative.
#[wasm_bindgen(js_name = normalizeCurrency)]
pub fn normalize_currency(value: &str, min_digits: usize, keep_decimal: bool) -> Option<String> {
    rules::normalize_currency(value, min_digits, keep_decimal)
}

/// Format a date as `MM/DD/YYYY` when possible.
#[wasm_bindgen(js_name = normalizeDate)]
pub fn normalize_date(value: &str) -> Option<String> {
    rules::normalize_date(value)
}

/// Extractor class for browser use, holding its own settings.
#[wasm_bindgen]
pub struct FieldExtractor {
    config: AidformConfig,
}

#[wasm_bindgen]
impl FieldExtractor {
    /// Create an extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: AidformConfig::default(),
        }
    }

    /// Create an extractor from a JSON configuration object.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<FieldExtractor, JsValue> {
        let config: AidformConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { config })
    }

    /// Drop fields scoring below `confidence`.
    #[wasm_bindgen(js_name = setMinConfidence)]
    pub fn set_min_confidence(&mut self, confidence: f64) -> Result<(), JsValue> {
        let mut config = self.config.clone();
        config.extraction.min_confidence = confidence;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.config = config;
        Ok(())
    }

    /// Toggle the Form 1040 numeric block heuristics.
    #[wasm_bindgen(js_name = setBlockDetection)]
    pub fn set_block_detection(&mut self, enabled: bool) {
        self.config.extraction.block_detection = enabled;
    }

    /// Extract fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, document_type: Option<String>) -> Result<JsValue, JsValue> {
        to_js(&self.fields(text, None, document_type.as_deref()))
    }

    /// Diagnostics for a merged field array, honoring this extractor's
    /// review settings.
    #[wasm_bindgen]
    pub fn diagnostics(&self, fields: JsValue) -> Result<JsValue, JsValue> {
        let fields = fields_from_js(fields)?;
        to_js(&Diagnostics::build_with(&fields, &self.config.review))
    }

    /// Extract fields with diagnostics, merging `ocr_text` when the direct
    /// text is near-empty.
    #[wasm_bindgen(js_name = extractWithMetadata)]
    pub fn extract_with_metadata(
        &self,
        text: &str,
        ocr_text: Option<String>,
        document_type: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let doc_type = DocumentType::from_declared(document_type.as_deref());
        let fields = self.fields(text, ocr_text.as_deref(), document_type.as_deref());
        let diagnostics = Diagnostics::build_with(&fields, &self.config.review);

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ExtractResult {
            document_type: DocumentType,
            fields: Vec<ExtractedField>,
            diagnostics: Diagnostics,
            used_ocr: bool,
            processing_time_ms: f64,
        }

        let output = ExtractResult {
            document_type: doc_type,
            used_ocr: ocr_text.is_some() && self.pipeline().needs_ocr(text),
            fields,
            diagnostics,
            processing_time_ms: js_sys::Date::now() - start,
        };

        to_js(&output)
    }
}

impl FieldExtractor {
    fn pipeline(&self) -> DocumentPipeline {
        DocumentPipeline::new(self.config.clone())
    }

    fn fields(
        &self,
        text: &str,
        ocr_text: Option<&str>,
        document_type: Option<&str>,
    ) -> Vec<ExtractedField> {
        let doc_type = DocumentType::from_declared(document_type);
        self.pipeline().extract_layers(text, ocr_text, doc_type)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_normalize_ssn() {
        assert_eq!(normalize_ssn("123 45 6789"), Some("123-45-6789".to_string()));
        assert_eq!(normalize_ssn("12345"), None);
    }

    #[wasm_bindgen_test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("(1,234)", 1, false), Some("-1234".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_infer_document_type() {
        assert_eq!(infer_document_type("Mom_W2_2023.pdf"), "W-2");
        assert_eq!(infer_document_type("scan.pdf"), "Other");
    }

    #[wasm_bindgen_test]
    fn test_extract_fields_json() {
        let json = extract_fields_json("Household Size: 4", None).unwrap();
        let fields: Vec<ExtractedField> = serde_json::from_str(&json).unwrap();
        assert_eq!(fields[0].question_id, "household-size");
        assert_eq!(fields[0].value, "4");
    }

    #[wasm_bindgen_test]
    fn test_extractor_merges_ocr_text() {
        let extractor = FieldExtractor::new();
        let fields = extractor.fields("", Some("Student SSN: 123-45-6789"), Some("SSN Letter"));
        assert!(fields.iter().all(|f| f.source.starts_with("ocr/")));
        assert!(fields.iter().any(|f| f.value == "123-45-6789"));
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ClientField {
        question_id: &'static str,
        value: &'static str,
        confidence: Option<f64>,
    }

    #[wasm_bindgen_test]
    fn test_merge_fields_clamps_client_input() {
        let a = to_js(&vec![ClientField {
            question_id: "parent-agi",
            value: "50987",
            confidence: Some(7.5),
        }])
        .unwrap();
        let b = to_js(&vec![ClientField {
            question_id: "parent-agi",
            value: " ",
            confidence: None,
        }])
        .unwrap();

        let merged: Vec<ExtractedField> =
            serde_wasm_bindgen::from_value(merge_fields(a, b).unwrap()).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, 1.0);
    }

    #[wasm_bindgen_test]
    fn test_min_confidence_is_validated() {
        let mut extractor = FieldExtractor::new();
        assert!(extractor.set_min_confidence(0.9).is_ok());
        assert!(extractor.set_min_confidence(1.5).is_err());
    }
}
