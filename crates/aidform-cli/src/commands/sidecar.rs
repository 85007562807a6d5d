//! OCR text supplied next to a document instead of recognized in-process.

use std::fs;
use std::path::{Path, PathBuf};

use aidform_core::{AidformError, Result, TextRecognizer};

/// Suffix of the sidecar file looked up next to each input.
pub const SIDECAR_SUFFIX: &str = "ocr.txt";

/// A recognizer that returns the contents of a text file produced by an
/// external OCR tool.
pub struct SidecarRecognizer {
    path: PathBuf,
}

impl SidecarRecognizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `scan.pdf` -> `scan.ocr.txt`, if that file exists.
    pub fn discover(input: &Path) -> Option<Self> {
        let path = sidecar_path(input);
        path.is_file().then(|| Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the sidecar text.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| AidformError::Ocr(format!("{}: {}", self.path.display(), e)))
    }
}

impl TextRecognizer for SidecarRecognizer {
    fn recognize(&self, _data: &[u8]) -> Result<String> {
        self.read()
    }
}

pub fn sidecar_path(input: &Path) -> PathBuf {
    input.with_extension(SIDECAR_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(sidecar_path(Path::new("docs/w2.pdf")), PathBuf::from("docs/w2.ocr.txt"));
    }

    #[test]
    fn test_missing_sidecar_is_an_ocr_error() {
        let recognizer = SidecarRecognizer::new("/nonexistent/scan.ocr.txt");
        assert!(matches!(recognizer.recognize(b""), Err(AidformError::Ocr(_))));
    }
}
