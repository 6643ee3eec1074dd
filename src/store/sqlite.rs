//! SQLite-backed document store.
//!
//! Documents live as JSON text in the `documents` table. Mutations read the document,
//! edit it and write it back inside an `IMMEDIATE` transaction, so each primitive is
//! atomic across threads and across processes sharing the database file.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::path::{self, JsonPath};
use super::{DocumentStore, StoreError};

pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = crate::db::open_database(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap a connection whose schema is already initialized.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(crate::db::open_memory_database()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run `f` inside an immediate (write-locking) transaction and commit on success.
    fn write<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

fn load(conn: &Connection, key: &str) -> Result<Option<Value>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM documents WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(StoreError::from)
}

fn save(conn: &Connection, key: &str, doc: &Value) -> Result<(), StoreError> {
    let now = chrono::Utc::now().to_rfc3339();
    let text = serde_json::to_string(doc)?;
    conn.execute(
        "INSERT INTO documents (key, value, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, text, now],
    )?;
    Ok(())
}

impl DocumentStore for SqliteDocumentStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM documents WHERE key = ?1)",
            params![key],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get_document(&self, key: &str, raw_path: &str) -> Result<Option<Value>, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        let conn = self.lock()?;
        let doc = load(&conn, key)?;
        Ok(doc.as_ref().and_then(|d| path.resolve(d)).cloned())
    }

    fn set_document(&self, key: &str, raw_path: &str, value: &Value) -> Result<(), StoreError> {
        let path = JsonPath::parse(raw_path)?;
        self.write(|tx| {
            if path.is_root() {
                return save(tx, key, value);
            }
            let mut doc = load(tx, key)?.ok_or_else(|| StoreError::NoSuchKey(key.to_string()))?;
            path::set_in(&mut doc, key, &path, raw_path, value.clone())?;
            save(tx, key, &doc)
        })
    }

    fn append_to_array(
        &self,
        key: &str,
        raw_path: &str,
        value: &Value,
    ) -> Result<usize, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        self.write(|tx| {
            let mut doc = load(tx, key)?.ok_or_else(|| StoreError::NoSuchKey(key.to_string()))?;
            let len = path::append_in(&mut doc, key, &path, raw_path, value.clone())?;
            save(tx, key, &doc)?;
            Ok(len)
        })
    }

    fn remove_from_array(
        &self,
        key: &str,
        raw_path: &str,
        index: i64,
    ) -> Result<Option<Value>, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        self.write(|tx| {
            let Some(mut doc) = load(tx, key)? else {
                return Ok(None);
            };
            let removed = path::remove_in(&mut doc, key, &path, raw_path, index)?;
            if removed.is_some() {
                save(tx, key, &doc)?;
            }
            Ok(removed)
        })
    }

    fn append_or_create(
        &self,
        key: &str,
        raw_path: &str,
        value: &Value,
    ) -> Result<usize, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        self.write(|tx| match load(tx, key)? {
            Some(mut doc) => {
                let len = path::append_in(&mut doc, key, &path, raw_path, value.clone())?;
                save(tx, key, &doc)?;
                Ok(len)
            }
            None if path.is_root() => {
                save(tx, key, &Value::Array(vec![value.clone()]))?;
                Ok(1)
            }
            None => Err(StoreError::NoSuchKey(key.to_string())),
        })
    }
}
