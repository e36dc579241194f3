//! OCR-backed text recovery for scanned PDFs and photographs.

use std::path::Path;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use tracing::{debug, info, warn};

use super::{DocumentKind, RecoveredText, TextRecovery};
use crate::error::{OcrError, RecoveryError, Result};
use crate::models::config::{FormscanConfig, ModelConfig, OcrConfig, PdfConfig};
use crate::ocr::PureOcrEngine;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Recovers document text with `pure-onnx-ocr`.
///
/// Models are loaded on first use, so building the adapter never touches disk.
pub struct OcrTextRecovery {
    models: ModelConfig,
    ocr: OcrConfig,
    pdf: PdfConfig,
    engine: Mutex<Option<Arc<PureOcrEngine>>>,
}

impl OcrTextRecovery {
    pub fn new(models: ModelConfig, ocr: OcrConfig, pdf: PdfConfig) -> Self {
        Self {
            models,
            ocr,
            pdf,
            engine: Mutex::new(None),
        }
    }

    pub fn from_config(config: &FormscanConfig) -> Self {
        Self::new(config.models.clone(), config.ocr.clone(), config.pdf.clone())
    }

    fn engine(&self) -> Result<Arc<PureOcrEngine>> {
        let mut slot = self
            .engine
            .lock()
            .map_err(|_| RecoveryError::from(OcrError::ModelLoad("engine lock poisoned".into())))?;
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(
            PureOcrEngine::from_config(&self.models, self.ocr.clone())
                .map_err(RecoveryError::from)?,
        );
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let text = self
            .engine()?
            .extract_text(image)
            .map_err(RecoveryError::from)?;
        Ok(text)
    }

    fn recover_image(&self, path: &Path) -> Result<RecoveredText> {
        let image = image::open(path).map_err(RecoveryError::from)?;
        debug!("Loaded image {}x{}", image.width(), image.height());
        Ok(RecoveredText::new(self.recognize(&image)?))
    }

    fn recover_pdf(&self, path: &Path) -> Result<RecoveredText> {
        let data = std::fs::read(path).map_err(RecoveryError::from)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).map_err(RecoveryError::from)?;

        if self.pdf.prefer_embedded_text {
            match extractor.extract_text() {
                Ok(text) if text.trim().len() >= self.pdf.min_text_length => {
                    debug!("Using embedded text layer ({} chars)", text.len());
                    return Ok(RecoveredText::new(text));
                }
                Ok(_) => debug!("Embedded text too short, falling back to OCR"),
                Err(e) => warn!("Embedded text extraction failed: {}", e),
            }
        }

        let mut page_count = extractor.page_count();
        if self.pdf.max_pages > 0 {
            page_count = page_count.min(self.pdf.max_pages as u32);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        for page in 1..=page_count {
            debug!("Running OCR on page {}/{}", page, page_count);
            let image = extractor.render_page(page).map_err(RecoveryError::from)?;
            pages.push(self.recognize(&image)?);
        }

        Ok(RecoveredText::from_pages(pages))
    }
}

impl TextRecovery for OcrTextRecovery {
    fn recover(&self, path: &Path) -> Result<RecoveredText> {
        let kind = DocumentKind::from_path(path)?;
        info!("Recovering text from {} ({:?})", path.display(), kind);

        match kind {
            DocumentKind::Image => self.recover_image(path),
            DocumentKind::Pdf => self.recover_pdf(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormscanError;

    fn without_models() -> OcrTextRecovery {
        let models = ModelConfig {
            model_dir: std::path::PathBuf::from("/nonexistent/formscan-models"),
            ..ModelConfig::default()
        };
        OcrTextRecovery::new(models, OcrConfig::default(), PdfConfig::default())
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = without_models().recover(Path::new("form.docx")).unwrap_err();
        assert!(matches!(err, FormscanError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_unreadable_image_is_recovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = without_models().recover(&path).unwrap_err();
        assert!(matches!(err, FormscanError::TextRecovery(RecoveryError::Image(_))));
    }

    #[test]
    fn test_missing_models_is_recovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        DynamicImage::new_rgb8(16, 16).save(&path).unwrap();

        let err = without_models().recover(&path).unwrap_err();
        assert!(matches!(err, FormscanError::TextRecovery(RecoveryError::Ocr(_))));
    }

    #[test]
    fn test_malformed_pdf_is_recovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-garbage").unwrap();

        let err = without_models().recover(&path).unwrap_err();
        assert!(matches!(err, FormscanError::TextRecovery(RecoveryError::Pdf(_))));
    }
}
