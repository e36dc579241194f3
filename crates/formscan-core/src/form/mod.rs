//! Application form field extraction.

mod engine;
pub mod rules;

pub use engine::{extract, ExtractionReport};
pub use rules::{FieldRule, FormRules, GroupRule, LeafRule, RepeatRule};

use crate::models::record::Record;
use crate::recovery::RecoveredText;

/// Trait for form field extractors.
pub trait Extractor {
    /// Extract a record from plain text. Never fails; unmatched fields stay empty.
    fn extract_from_text(&self, text: &str) -> Record;

    /// Extract a record from recovered OCR text.
    fn extract(&self, text: &RecoveredText) -> Record {
        self.extract_from_text(text.as_str())
    }
}

impl<T: Extractor + ?Sized> Extractor for &T {
    fn extract_from_text(&self, text: &str) -> Record {
        (**self).extract_from_text(text)
    }
}
