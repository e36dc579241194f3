//! Core library for application form OCR processing.
//!
//! This crate provides:
//! - Text recovery from scanned PDFs and photographs (OCR via `pure-onnx-ocr`)
//! - A declarative field rule set and the engine that applies it
//! - Application record models with a fixed JSON shape
//! - Record stores (in-memory and SQLite)
//! - An intake service for upload, listing, search and lookup

pub mod error;
pub mod form;
pub mod models;
pub mod recovery;
pub mod service;
pub mod store;

#[cfg(feature = "ocr")]
pub mod ocr;
#[cfg(feature = "ocr")]
pub mod pdf;

pub use error::{FormscanError, Result};
pub use form::{extract, ExtractionReport, Extractor, FieldRule, FormRules};
pub use models::config::FormscanConfig;
pub use models::record::{Address, EmergencyContact, Qualification, Record, RecordId, StoredRecord};
pub use recovery::{DocumentKind, RecoveredText, TextRecovery};
#[cfg(feature = "ocr")]
pub use recovery::OcrTextRecovery;
pub use service::{BatchOutcome, BatchPolicy, DocumentError, IntakeService, SearchQuery, UploadedFile};
pub use store::{open_store, MemoryStore, RecordStore, SearchField};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
