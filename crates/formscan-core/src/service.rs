//! Request layer: upload, list, search and lookup of application records.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{FormscanError, Result};
use crate::form::Extractor;
use crate::models::config::UploadConfig;
use crate::models::record::{RecordId, StoredRecord};
use crate::recovery::{DocumentKind, TextRecovery};
use crate::store::{contains, RecordStore, SearchField};

/// A file received for processing.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name. Untrusted; sanitized before use.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a local file, keeping its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(filename, std::fs::read(path)?))
    }
}

/// Reduce a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators become word breaks, whitespace runs become `_` and any
/// other character outside `[A-Za-z0-9._-]` is dropped. Leading and trailing
/// dots and underscores are stripped, so `../../etc/passwd` becomes
/// `etc_passwd`. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let flattened = filename.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// What to do when one file of a batch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the first failing file.
    #[default]
    FailFast,
    /// Process every file and report failures per item.
    ContinueOnError,
}

/// Failure of a single file within a batch.
#[derive(Error, Debug)]
#[error("Error processing file {filename}: {source}")]
pub struct DocumentError {
    pub filename: String,
    #[source]
    pub source: FormscanError,
}

/// Per-file results of an upload, in submission order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub items: Vec<std::result::Result<StoredRecord, DocumentError>>,
}

impl BatchOutcome {
    /// Successfully stored records.
    pub fn stored(&self) -> impl Iterator<Item = &StoredRecord> {
        self.items.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentError> {
        self.items.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Summary line for the upload response.
    pub fn message(&self) -> String {
        format!("Successfully processed {} file(s)", self.stored().count())
    }

    pub fn into_stored(self) -> Vec<StoredRecord> {
        self.items.into_iter().filter_map(|r| r.ok()).collect()
    }
}

/// Record search criteria. Empty criteria are ignored; given criteria must all match.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SearchQuery {
    fn criteria(&self) -> Vec<(SearchField, &str)> {
        [
            (SearchField::Name, self.name.as_deref()),
            (SearchField::EmailId, self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
        .collect()
    }
}

/// Upload and query service over a recovery adapter, an extractor and a store.
pub struct IntakeService<R: TextRecovery, E: Extractor> {
    recovery: R,
    extractor: E,
    store: Box<dyn RecordStore>,
    upload_dir: PathBuf,
}

impl<R: TextRecovery, E: Extractor> IntakeService<R, E> {
    pub fn new(recovery: R, extractor: E, store: Box<dyn RecordStore>, upload: UploadConfig) -> Self {
        Self {
            recovery,
            extractor,
            store,
            upload_dir: upload.upload_dir,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Process and store each file in order.
    ///
    /// Returns [`FormscanError::NoFiles`] for an empty batch. Under
    /// [`BatchPolicy::FailFast`] the outcome ends at the first failure;
    /// records stored before it are kept.
    pub fn upload(&self, files: Vec<UploadedFile>, policy: BatchPolicy) -> Result<BatchOutcome> {
        if files.is_empty() {
            return Err(FormscanError::NoFiles);
        }

        let start = Instant::now();
        let total = files.len();
        let mut outcome = BatchOutcome::default();

        for file in files {
            match self.process_file(&file) {
                Ok(stored) => outcome.items.push(Ok(stored)),
                Err(source) => {
                    warn!("Failed to process {}: {}", file.filename, source);
                    outcome.items.push(Err(DocumentError {
                        filename: file.filename,
                        source,
                    }));
                    if policy == BatchPolicy::FailFast {
                        break;
                    }
                }
            }
        }

        info!(
            "Processed {}/{} file(s) in {:?}",
            outcome.stored().count(),
            total,
            start.elapsed()
        );

        Ok(outcome)
    }

    fn process_file(&self, file: &UploadedFile) -> Result<StoredRecord> {
        let safe_name = secure_filename(&file.filename);
        DocumentKind::from_path(Path::new(&safe_name))
            .map_err(|_| FormscanError::UnsupportedFileType(file.filename.clone()))?;

        // Validated above, so there is an extension
        let suffix = Path::new(&safe_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        std::fs::create_dir_all(&self.upload_dir)?;
        let mut temp = tempfile::Builder::new()
            .prefix("formscan-")
            .suffix(&suffix)
            .tempfile_in(&self.upload_dir)?;
        temp.write_all(&file.bytes)?;
        temp.flush()?;

        debug!("Saved {} to {}", safe_name, temp.path().display());

        let text = self.recovery.recover(temp.path())?;
        let record = self.extractor.extract(&text);
        self.store.put(&record)
    }

    pub fn list(&self) -> Result<Vec<StoredRecord>> {
        self.store.list()
    }

    /// Case-insensitive substring search; no criteria returns every record.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<StoredRecord>> {
        let criteria = query.criteria();
        let Some(((field, needle), rest)) = criteria.split_first() else {
            return self.store.list();
        };

        let candidates = self.store.find_by_field_substring(*field, needle, true)?;
        Ok(candidates
            .into_iter()
            .filter(|stored| {
                rest.iter().all(|(field, needle)| {
                    field
                        .value(&stored.record)
                        .is_some_and(|value| contains(value, needle, true))
                })
            })
            .collect())
    }

    /// Look up a record by its string id. Ids that do not parse are not found.
    pub fn get(&self, id: &str) -> Result<StoredRecord> {
        let id: RecordId = id
            .parse()
            .map_err(|_| FormscanError::NotFound(id.to_string()))?;
        self.store.get_by_id(&id)
    }
}
