//! Process-local store.

use std::sync::RwLock;

use super::{contains, RecordStore, SearchField};
use crate::error::{FormscanError, Result, StoreError};
use crate::models::record::{Record, RecordId, StoredRecord};

/// In-memory record store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn put(&self, record: &Record) -> Result<StoredRecord> {
        let stored = StoredRecord {
            id: RecordId::generate(),
            record: record.clone(),
        };
        self.records
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(stored.clone());
        Ok(stored)
    }

    fn get_by_id(&self, id: &RecordId) -> Result<StoredRecord> {
        self.records
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .iter()
            .find(|r| r.id == *id)
            .cloned()
            .ok_or_else(|| FormscanError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        Ok(self.records.read().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn find_by_field_substring(
        &self,
        field: SearchField,
        needle: &str,
        case_insensitive: bool,
    ) -> Result<Vec<StoredRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| {
                field
                    .value(&r.record)
                    .is_some_and(|value| contains(value, needle, case_insensitive))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::exercise_store;

    #[test]
    fn test_memory_store() {
        exercise_store(&MemoryStore::new());
    }
}
