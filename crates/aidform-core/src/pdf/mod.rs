//! PDF text intake.
//!
//! Only the embedded text layer is read. Scanned pages come back empty and
//! are left to an OCR collaborator.

mod extractor;

pub use extractor::{PdfContent, PdfExtractor};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text readers.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Number of pages in the loaded PDF.
    fn page_count(&self) -> u32;

    /// Text of the loaded PDF, honoring the reader's page limit.
    fn extract_text(&self) -> Result<String>;

    /// Text of one page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
