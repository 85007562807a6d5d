//! Error types for the aidform-core library.
//!
//! The extraction engine itself never fails: a rule that does not match, a
//! capture the normalizer rejects, or an implausible numeric block simply
//! yields fewer fields. The errors below cover the surfaces around the
//! engine (PDF intake, OCR collaborators, configuration).

use thiserror::Error;

/// Main error type for the aidform library.
#[derive(Error, Debug)]
pub enum AidformError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An external text recognizer failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to PDF text intake.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Page number out of range.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to configuration files and values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Access {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the config schema.
    #[error("invalid configuration in {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value is outside its allowed range.
    #[error("{key} out of range: {value}")]
    OutOfRange { key: String, value: String },
}

/// Result type for the aidform library.
pub type Result<T> = std::result::Result<T, AidformError>;
