//! Text recovery: turning an uploaded document into plain text.

#[cfg(feature = "ocr")]
mod ocr;

#[cfg(feature = "ocr")]
pub use ocr::OcrTextRecovery;

use std::fmt;
use std::path::Path;

use crate::error::{FormscanError, Result};

/// Plain text recovered from a document. Pages are joined with newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveredText(String);

impl RecoveredText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Join per-page texts in page order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, page) in pages.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(page.as_ref());
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RecoveredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepted document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Classify a file by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("jpg") | Some("jpeg") | Some("png") => Ok(Self::Image),
            _ => Err(FormscanError::UnsupportedFileType(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            )),
        }
    }
}

/// Trait for document-to-text backends.
pub trait TextRecovery {
    /// Recover the text of the document at `path`.
    fn recover(&self, path: &Path) -> Result<RecoveredText>;
}

impl<F> TextRecovery for F
where
    F: Fn(&Path) -> Result<RecoveredText>,
{
    fn recover(&self, path: &Path) -> Result<RecoveredText> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_pages_joins_in_order() {
        let text = RecoveredText::from_pages(["page one", "page two", "page three"]);
        assert_eq!(text.as_str(), "page one\npage two\npage three");

        assert!(RecoveredText::from_pages(Vec::<String>::new()).is_empty());
        assert_eq!(RecoveredText::from_pages(["only"]).into_string(), "only");
    }

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_path(Path::new("a.pdf")).unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("scan.PDF")).unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("b.JPG")).unwrap(), DocumentKind::Image);
        assert_eq!(DocumentKind::from_path(Path::new("c.jpeg")).unwrap(), DocumentKind::Image);
        assert_eq!(DocumentKind::from_path(Path::new("d.png")).unwrap(), DocumentKind::Image);
    }

    #[test]
    fn test_document_kind_rejects_others() {
        for name in ["form.docx", "form.gif", "README", "archive.pdf.zip"] {
            match DocumentKind::from_path(Path::new(name)) {
                Err(FormscanError::UnsupportedFileType(file)) => assert_eq!(file, name),
                other => panic!("expected UnsupportedFileType for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_closure_recovery() {
        let recovery = |_: &Path| -> Result<RecoveredText> { Ok(RecoveredText::new("Age: 30")) };
        assert_eq!(recovery.recover(Path::new("x.png")).unwrap().as_str(), "Age: 30");
    }
}
