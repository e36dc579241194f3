//! SQLite-backed store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{RecordStore, SearchField};
use crate::error::{FormscanError, Result, StoreError};
use crate::models::record::{Record, RecordId, StoredRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT,
    email TEXT,
    document TEXT NOT NULL
);
";

/// Record store in a single SQLite database file.
///
/// `name` and `email` are denormalized out of the JSON document for search.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::from)?;
            }
        }
        let conn = Connection::open(path).map_err(StoreError::from)?;
        debug!("Opened record database {}", path.display());
        Self::with_connection(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(StoreError::from)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(StoreError::from)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> std::result::Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<StoredRecord>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).map_err(StoreError::from)?;
        let rows = stmt
            .query_map(params, |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(StoreError::from)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, document) = row.map_err(StoreError::from)?;
            records.push(decode(&id, &document)?);
        }
        Ok(records)
    }
}

fn decode(id: &str, document: &str) -> std::result::Result<StoredRecord, StoreError> {
    let id: RecordId = id
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("bad id {id:?}: {e}")))?;
    let record: Record = serde_json::from_str(document)?;
    Ok(StoredRecord { id, record })
}

impl RecordStore for SqliteStore {
    fn put(&self, record: &Record) -> Result<StoredRecord> {
        let stored = StoredRecord {
            id: RecordId::generate(),
            record: record.clone(),
        };
        let document = serde_json::to_string(record).map_err(StoreError::from)?;

        self.connection()?
            .execute(
                "INSERT INTO records (id, name, email, document) VALUES (?1, ?2, ?3, ?4)",
                params![stored.id.to_string(), record.name, record.email, document],
            )
            .map_err(StoreError::from)?;

        debug!("Stored record {}", stored.id);
        Ok(stored)
    }

    fn get_by_id(&self, id: &RecordId) -> Result<StoredRecord> {
        let conn = self.connection()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM records WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;

        match document {
            Some(document) => Ok(StoredRecord {
                id: *id,
                record: serde_json::from_str(&document).map_err(StoreError::from)?,
            }),
            None => Err(FormscanError::NotFound(id.to_string())),
        }
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        self.query("SELECT id, document FROM records ORDER BY seq", [])
    }

    fn find_by_field_substring(
        &self,
        field: SearchField,
        needle: &str,
        case_insensitive: bool,
    ) -> Result<Vec<StoredRecord>> {
        let column = match field {
            SearchField::Name => "name",
            SearchField::EmailId => "email",
        };
        let sql = if case_insensitive {
            format!(
                "SELECT id, document FROM records \
                 WHERE {column} IS NOT NULL AND instr(lower({column}), lower(?1)) > 0 ORDER BY seq"
            )
        } else {
            format!(
                "SELECT id, document FROM records \
                 WHERE {column} IS NOT NULL AND instr({column}, ?1) > 0 ORDER BY seq"
            )
        };
        self.query(&sql, params![needle])
    }
}
