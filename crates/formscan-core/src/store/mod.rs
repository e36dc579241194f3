//! Record persistence.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use tracing::info;

use crate::error::Result;
use crate::models::config::{StorageBackend, StorageConfig};
use crate::models::record::{Record, RecordId, StoredRecord};

/// Record fields that support substring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    EmailId,
}

impl SearchField {
    /// Value of this field in `record`, if extracted.
    pub fn value(self, record: &Record) -> Option<&str> {
        match self {
            Self::Name => record.name.as_deref(),
            Self::EmailId => record.email.as_deref(),
        }
    }
}

/// Trait for record store backends.
///
/// Implementations synchronize internally and may be shared between threads.
pub trait RecordStore: Send + Sync {
    /// Persist `record` under a fresh identifier.
    fn put(&self, record: &Record) -> Result<StoredRecord>;

    /// Look up a record. Unknown ids are [`FormscanError::NotFound`](crate::FormscanError::NotFound).
    fn get_by_id(&self, id: &RecordId) -> Result<StoredRecord>;

    /// All records in insertion order.
    fn list(&self) -> Result<Vec<StoredRecord>>;

    /// Records whose `field` contains `needle`. Records where the field is
    /// null never match.
    fn find_by_field_substring(
        &self,
        field: SearchField,
        needle: &str,
        case_insensitive: bool,
    ) -> Result<Vec<StoredRecord>>;
}

/// Substring test shared by backends that filter in Rust.
pub(crate) fn contains(haystack: &str, needle: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle)
    }
}

/// Open the backend selected in `config`.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn RecordStore>> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory record store");
            Ok(Box::new(MemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            info!("Using SQLite record store at {}", config.database_path.display());
            Ok(Box::new(SqliteStore::open(&config.database_path)?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err(crate::error::FormscanError::Config(
            "SQLite storage is not enabled in this build".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormscanError;
    use pretty_assertions::assert_eq;

    pub(crate) fn person(name: Option<&str>, email: Option<&str>) -> Record {
        Record {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            ..Record::default()
        }
    }

    /// Behaviour every backend must share.
    pub(crate) fn exercise_store(store: &dyn RecordStore) {
        let john = store.put(&person(Some("JOHN SMITH"), Some("john@example.com"))).unwrap();
        let jane = store.put(&person(Some("Jane Doe"), None)).unwrap();
        let anon = store.put(&person(None, Some("anon@example.org"))).unwrap();
        assert_ne!(john.id, jane.id);

        assert_eq!(store.get_by_id(&john.id).unwrap(), john);
        assert_eq!(store.list().unwrap(), vec![john.clone(), jane.clone(), anon.clone()]);

        let found = store.find_by_field_substring(SearchField::Name, "john", true).unwrap();
        assert_eq!(found, vec![john.clone()]);

        let found = store.find_by_field_substring(SearchField::Name, "john", false).unwrap();
        assert!(found.is_empty());

        let found = store.find_by_field_substring(SearchField::EmailId, "example", true).unwrap();
        assert_eq!(found, vec![john.clone(), anon.clone()]);

        // Null names never match, not even the empty needle
        let found = store.find_by_field_substring(SearchField::Name, "", true).unwrap();
        assert_eq!(found, vec![john, jane]);

        let missing = RecordId::generate();
        assert!(matches!(store.get_by_id(&missing), Err(FormscanError::NotFound(_))));
    }

    #[test]
    fn test_contains() {
        assert!(contains("JOHN SMITH", "john", true));
        assert!(!contains("JOHN SMITH", "john", false));
        assert!(contains("JOHN SMITH", "", false));
    }

    #[test]
    fn test_open_memory_store() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let store = open_store(&config).unwrap();
        exercise_store(store.as_ref());
    }
}
