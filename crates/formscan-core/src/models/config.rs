//! Configuration structures for the form processing pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FormscanError, Result};
use crate::form::rules::patterns;

/// Main configuration for formscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Record store configuration.
    pub storage: StorageConfig,

    /// Upload handling configuration.
    pub upload: UploadConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Maximum image dimension (longer side) for processing.
    pub max_image_size: u32,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            max_image_size: 2048,
            keep_unk: false,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Use the embedded text layer when it is long enough instead of OCR.
    pub prefer_embedded_text: bool,

    /// Minimum embedded text length to skip OCR.
    pub min_text_length: usize,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: false,
            min_text_length: 50,
            max_pages: 0,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Field patterns. Any pattern left out keeps its built-in default.
    pub patterns: PatternConfig,

    /// Maximum number of qualification rows per document (None = all).
    pub max_qualifications: Option<usize>,
}

/// Source patterns for every field, shaped like the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub name: String,
    pub permanent_address: AddressPatterns,
    pub current_address: AddressPatterns,
    pub date_of_birth: String,
    pub age: String,
    pub gender: String,
    pub mobile: String,
    pub email: String,
    pub emergency_contact: ContactPatterns,
    pub available_for_relocation: String,
    pub education: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            name: patterns::NAME.to_string(),
            permanent_address: AddressPatterns::permanent(),
            current_address: AddressPatterns::current(),
            date_of_birth: patterns::DATE_OF_BIRTH.to_string(),
            age: patterns::AGE.to_string(),
            gender: patterns::GENDER.to_string(),
            mobile: patterns::MOBILE.to_string(),
            email: patterns::EMAIL.to_string(),
            emergency_contact: ContactPatterns::default(),
            available_for_relocation: patterns::RELOCATION.to_string(),
            education: patterns::EDUCATION.to_string(),
        }
    }
}

/// Patterns for one address block.
///
/// An address block in a config file must list all five patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatterns {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl AddressPatterns {
    /// Default patterns anchored on the permanent address heading.
    pub fn permanent() -> Self {
        Self::anchored(patterns::PERMANENT_ADDRESS)
    }

    /// Default patterns anchored on the current address heading.
    pub fn current() -> Self {
        Self::anchored(patterns::CURRENT_ADDRESS)
    }

    fn anchored(heading: &str) -> Self {
        let [street, city, state, zip_code, country] = patterns::address(heading);
        Self {
            street,
            city,
            state,
            zip_code,
            country,
        }
    }

    /// Patterns in `Address::FIELDS` order.
    pub fn to_array(&self) -> [&str; 5] {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
            self.country.as_str(),
        ]
    }
}

/// Patterns for the emergency contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPatterns {
    pub name: String,
    pub number: String,
}

impl Default for ContactPatterns {
    fn default() -> Self {
        Self {
            name: patterns::EMERGENCY_NAME.to_string(),
            number: patterns::EMERGENCY_NUMBER.to_string(),
        }
    }
}

/// OCR model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

/// Record store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit.
    Memory,
    /// SQLite database file.
    Sqlite,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Database file for the SQLite backend.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            database_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("formscan")
                .join("records.db"),
        }
    }
}

/// Upload handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory that holds uploaded files while they are processed.
    pub upload_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: std::env::temp_dir().join("formscan-uploads"),
        }
    }
}

impl FormscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            FormscanError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FormscanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default location of the user configuration file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("formscan")
            .join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{"extraction": {"patterns": {"age": "Years:\\s*(\\d+)"}}}"#;
        let config: FormscanConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.extraction.patterns.age, r"Years:\s*(\d+)");
        assert_eq!(config.extraction.patterns.name, patterns::NAME);
        assert_eq!(
            config.extraction.patterns.current_address,
            AddressPatterns::current()
        );
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.ocr.max_image_size, 2048);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FormscanConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.extraction.max_qualifications = Some(1);
        config.save(&path).unwrap();

        let loaded = FormscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Memory);
        assert_eq!(loaded.extraction.max_qualifications, Some(1));
        assert_eq!(loaded.extraction.patterns, PatternConfig::default());
    }

    #[test]
    fn test_model_path_joins_model_dir() {
        let models = ModelConfig {
            model_dir: PathBuf::from("/opt/formscan/models"),
            ..ModelConfig::default()
        };
        assert_eq!(
            models.model_path(&models.recognition_model),
            PathBuf::from("/opt/formscan/models/latin_rec.onnx")
        );
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FormscanConfig::from_file(&path),
            Err(FormscanError::Config(_))
        ));
    }
}
