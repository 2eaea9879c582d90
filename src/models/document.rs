use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::preview;

// =============================================================================
// Identifiers
// =============================================================================

/// Server-assigned document identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(pub i64);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Document Summary
// =============================================================================

/// Read-only projection returned by listing and search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub doc_id: DocId,
    pub original_filename: String,
    /// Upload timestamp as sent by the server (ISO-8601 in practice).
    pub upload_date: String,
    /// Declared MIME type.
    pub file_type: String,
}

impl DocumentSummary {
    /// Whether the declared MIME type is an image (thumbnail candidate).
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }

    /// Lowercase extension of the filename, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.original_filename)
    }
}

/// Lowercase extension after the last dot, ignoring dotfiles without one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

// =============================================================================
// File Kind
// =============================================================================

/// Coarse file kind derived from the extension, used for icons and preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Text,
    Word,
    Slides,
    Spreadsheet,
    Unknown,
}

impl FileKind {
    /// Detect kind from a filename extension.
    pub fn from_filename(name: &str) -> Self {
        let Some(ext) = extension_of(name) else {
            return Self::Unknown;
        };
        let ext = ext.as_str();
        if preview::IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else if preview::PDF_EXTENSIONS.contains(&ext) {
            Self::Pdf
        } else if preview::TEXT_EXTENSIONS.contains(&ext) {
            Self::Text
        } else {
            match ext {
                "doc" | "docx" | "odt" | "rtf" => Self::Word,
                "ppt" | "pptx" | "odp" => Self::Slides,
                "xls" | "xlsx" | "ods" => Self::Spreadsheet,
                _ => Self::Unknown,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, mime: &str) -> DocumentSummary {
        DocumentSummary {
            doc_id: DocId(1),
            original_filename: name.to_string(),
            upload_date: "2024-01-01T00:00:00".to_string(),
            file_type: mime.to_string(),
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.PDF"), Some("pdf".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_file_kind_from_filename() {
        assert_eq!(FileKind::from_filename("photo.JPG"), FileKind::Image);
        assert_eq!(FileKind::from_filename("paper.pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("notes.md"), FileKind::Text);
        assert_eq!(FileKind::from_filename("letter.docx"), FileKind::Word);
        assert_eq!(FileKind::from_filename("deck.pptx"), FileKind::Slides);
        assert_eq!(FileKind::from_filename("budget.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_filename("binary.exe"), FileKind::Unknown);
        assert_eq!(FileKind::from_filename("noext"), FileKind::Unknown);
    }

    #[test]
    fn test_is_image_uses_mime() {
        assert!(doc("a.bin", "image/png").is_image());
        assert!(!doc("a.png", "application/octet-stream").is_image());
    }
}
