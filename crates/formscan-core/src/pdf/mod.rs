//! PDF loading and page rasterization.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the embedded text layer of the whole document.
    fn extract_text(&self) -> Result<String>;

    /// Render a page (1-indexed) as an image.
    fn render_page(&self, page: u32) -> Result<DynamicImage>;
}
