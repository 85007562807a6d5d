//! Core library for financial-aid document field extraction.
//!
//! This crate provides:
//! - A rule-based extraction engine mapping document text to candidate
//!   answers for financial-aid questions (AGI, wages, tax, SSN, ...)
//! - Positional heuristics for the unlabeled numeric tables of Form 1040
//! - Merging of field sets from several passes (direct text, OCR)
//! - Review diagnostics over merged fields
//! - PDF text intake (native only)

pub mod error;
pub mod extraction;
pub mod models;
#[cfg(feature = "native")]
pub mod pdf;
pub mod pipeline;
pub mod review;

pub use error::{AidformError, ConfigError, PdfError, Result};
pub use extraction::{FieldEngine, FieldExtractor, extract_fields, merge_fields};
pub use models::config::{AidformConfig, ExtractionConfig, PdfConfig, ReviewConfig};
pub use models::document::DocumentType;
pub use models::field::ExtractedField;
pub use models::question::{FieldCategory, Question};
#[cfg(feature = "native")]
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use pipeline::{DocumentPipeline, ProcessedDocument, TextRecognizer};
pub use review::{Diagnostics, best_per_question};
