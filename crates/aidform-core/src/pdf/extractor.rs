//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// Reads the text layer of a PDF, up to a page limit.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: usize,
}

/// Text read from a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfContent {
    /// Extracted text, possibly empty for scanned documents.
    pub text: String,
    /// Pages in the document.
    pub page_count: u32,
    /// Pages the text was read from.
    pub pages_read: u32,
}

impl PdfContent {
    /// Whether pages past the limit were skipped.
    pub fn is_truncated(&self) -> bool {
        self.pages_read < self.page_count
    }
}

impl PdfExtractor {
    /// Create an extractor that reads every page.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
        }
    }

    /// Limit text extraction to the first `max_pages` pages (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Load `data` and read its text in one step.
    pub fn read(&mut self, data: &[u8]) -> Result<PdfContent> {
        self.load(data)?;
        let text = self.extract_text()?;
        let page_count = self.page_count();
        Ok(PdfContent {
            text,
            page_count,
            pages_read: self.pages_to_read().len() as u32,
        })
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Page numbers within the limit, ascending.
    fn pages_to_read(&self) -> Vec<u32> {
        let Some(doc) = self.document.as_ref() else {
            return Vec::new();
        };
        let mut pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        pages.sort_unstable();
        if self.max_pages > 0 {
            pages.truncate(self.max_pages);
        }
        pages
    }

    fn extract_with_lopdf(&self, pages: &[u32]) -> Result<String> {
        self.document()?
            .extract_text(pages)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs encrypted with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        let pages = self.pages_to_read();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        // pdf-extract handles layout better but only reads whole documents.
        if pages.len() as u32 == self.page_count() {
            match pdf_extract::extract_text_from_mem(&self.raw_data) {
                Ok(text) => return Ok(text),
                Err(e) => warn!("pdf-extract failed, falling back to lopdf: {}", e),
            }
        } else {
            debug!("Reading {} of {} pages", pages.len(), self.page_count());
        }

        self.extract_with_lopdf(&pages)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }
        self.extract_with_lopdf(&[page])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    fn sample_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for i in 0..pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("Household Size {}", i + 1))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(matches!(extractor.extract_text(), Err(PdfError::NoPages)));
    }

    #[test]
    fn test_rejects_non_pdf() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_loads_pages() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf(3)).unwrap();
        assert_eq!(extractor.page_count(), 3);
        assert!(matches!(
            extractor.extract_page_text(9),
            Err(PdfError::InvalidPage(9))
        ));
    }

    #[test]
    fn test_page_limit() {
        let mut extractor = PdfExtractor::new().with_max_pages(2);
        extractor.load(&sample_pdf(3)).unwrap();
        assert_eq!(extractor.pages_to_read(), vec![1, 2]);
    }
}
