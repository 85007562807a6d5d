//! Supported document types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an uploaded document.
///
/// Selects which per-type rule catalog applies on top of the summary rules.
/// Anything the caller cannot map onto one of these is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// IRS Form 1040 (individual income tax return).
    #[serde(rename = "1040")]
    Form1040,
    /// W-2 wage and tax statement.
    #[serde(rename = "W-2")]
    W2,
    /// 1099 information return.
    #[serde(rename = "1099")]
    Form1099,
    /// Social Security Administration letter.
    #[serde(rename = "SSN Letter")]
    SsnLetter,
    /// Anything else; only summary rules apply.
    #[default]
    Other,
}

impl DocumentType {
    /// All document types, in display order.
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Form1040,
        DocumentType::W2,
        DocumentType::Form1099,
        DocumentType::SsnLetter,
        DocumentType::Other,
    ];

    /// Wire name, also used as the `source` tag of type-specific fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Form1040 => "1040",
            DocumentType::W2 => "W-2",
            DocumentType::Form1099 => "1099",
            DocumentType::SsnLetter => "SSN Letter",
            DocumentType::Other => "Other",
        }
    }

    /// Human-readable label for pickers.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Form1040 => "Form 1040",
            DocumentType::W2 => "W-2",
            DocumentType::Form1099 => "1099",
            DocumentType::SsnLetter => "SSN letter",
            DocumentType::Other => "Other",
        }
    }

    /// Parse an exact wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Map a caller-declared type onto the enumeration, defaulting to `Other`.
    pub fn from_declared(declared: Option<&str>) -> Self {
        declared.and_then(Self::parse).unwrap_or_default()
    }

    /// Guess the document type from an upload's file name.
    pub fn infer_from_filename(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("w2") || name.contains("w-2") {
            DocumentType::W2
        } else if name.contains("1099") {
            DocumentType::Form1099
        } else if name.contains("ssn") || name.contains("social security") {
            DocumentType::SsnLetter
        } else if name.contains("1040") || name.contains("tax return") {
            DocumentType::Form1040
        } else {
            DocumentType::Other
        }
    }

    /// Whether the dense-table block heuristics apply to this type.
    pub fn is_tabular(&self) -> bool {
        matches!(self, DocumentType::Form1040)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
