//! Backing JSON document store.
//!
//! Provides the [`DocumentStore`] trait with document-level primitives, a durable
//! SQLite backend and an in-process backend. The backend is created via
//! [`create_store`] from configuration.

pub mod memory;
pub mod path;
pub mod sqlite;

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Failure from a store primitive. The `Display` text is what callers see.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no such key: {0}")]
    NoSuchKey(String),

    #[error("path {path} not found in document {key}")]
    PathNotFound { key: String, path: String },

    #[error("value at {path} in document {key} is not an array")]
    NotAnArray { key: String, path: String },

    #[error("unsupported JSON path: {0}")]
    UnsupportedPath(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Document-level key/value store with JSON values.
///
/// Each primitive is atomic and linearizable per key. All methods are synchronous;
/// callers in async contexts should use `tokio::task::spawn_blocking`.
pub trait DocumentStore: Send + Sync {
    /// Short backend name, e.g. `"sqlite"`.
    fn backend(&self) -> &'static str;

    fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Value at `path` in the document at `key`, or `None` if the key or path is absent.
    fn get_document(&self, key: &str, path: &str) -> Result<Option<Value>, StoreError>;

    /// Set the value at `path`. At the root this creates the key if absent.
    fn set_document(&self, key: &str, path: &str, value: &Value) -> Result<(), StoreError>;

    /// Append to an existing array. Returns the new array length.
    fn append_to_array(&self, key: &str, path: &str, value: &Value) -> Result<usize, StoreError>;

    /// Remove and return the element at `index`, or `None` if the key is absent or the
    /// index is out of range.
    fn remove_from_array(
        &self,
        key: &str,
        path: &str,
        index: i64,
    ) -> Result<Option<Value>, StoreError>;

    /// Create `[value]` at the root if the key is absent, otherwise append to the array
    /// at `path`. Returns the new array length.
    ///
    /// The default is two separate primitives: concurrent callers that both see an
    /// absent key will each write a fresh one-element list and the first write is lost.
    /// Backends override this with a single atomic operation.
    fn append_or_create(&self, key: &str, path: &str, value: &Value) -> Result<usize, StoreError> {
        if self.exists(key)? {
            self.append_to_array(key, path, value)
        } else {
            self.set_document(key, path, &Value::Array(vec![value.clone()]))?;
            Ok(1)
        }
    }
}

/// Create a document store from config.
///
/// Supported backends: `"sqlite"` (durable, default) and `"memory"` (process-local).
pub fn create_store(
    config: &crate::config::StorageConfig,
) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.backend.as_str() {
        "sqlite" => {
            let db_path = config.resolved_db_path();
            let store = sqlite::SqliteDocumentStore::open(&db_path)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::InMemoryDocumentStore::new())),
        other => anyhow::bail!("unknown storage backend: {other}. Supported: sqlite, memory"),
    }
}
