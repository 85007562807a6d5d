//! Data models: documents, questions, extracted fields, configuration.

pub mod config;
pub mod document;
pub mod field;
pub mod question;

pub use config::AidformConfig;
pub use document::DocumentType;
pub use field::{ExtractedField, clamp_confidence};
pub use question::{FieldCategory, Question};
