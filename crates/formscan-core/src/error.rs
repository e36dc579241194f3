//! Error types for the formscan-core library.

use thiserror::Error;

/// Main error type for the formscan library.
#[derive(Error, Debug)]
pub enum FormscanError {
    /// File extension is not one of the accepted document types.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// OCR or rasterization failed for a document.
    #[error("text recovery failed: {0}")]
    TextRecovery(#[from] RecoveryError),

    /// Malformed rule set or configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// No record with the requested identifier.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An upload request carried no files.
    #[error("no files provided")]
    NoFiles,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while recovering text from a document.
#[derive(Error, Debug)]
pub enum RecoveryError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decoding error.
    #[cfg(feature = "ocr")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The build has no OCR backend compiled in.
    #[error("OCR support is not enabled in this build")]
    Unavailable,
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors raised by a record store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite backend error.
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be read back as a record.
    #[error("corrupt stored record: {0}")]
    Corrupt(String),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// I/O error while opening the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the formscan library.
pub type Result<T> = std::result::Result<T, FormscanError>;
