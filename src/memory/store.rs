//! Per-user memory lists on top of a [`DocumentStore`].
//!
//! A list is a JSON array of strings at the root of the document named by the user's
//! [`StorageKey`]. An absent key reads as an empty list. Lists are created by the first
//! append and never deleted; removing the last item leaves an empty array behind.
//!
//! Indices are positions at the moment a removal executes. Removing several items means
//! removing one at a time and re-reading between calls, since each removal shifts every
//! later item down by one.

use serde_json::Value;
use std::sync::Arc;

use crate::identity::StorageKey;
use crate::memory::types::{AppendOutcome, RecallOutcome, RemoveOutcome};
use crate::store::path::ROOT;
use crate::store::{DocumentStore, StoreError};

/// Owner and sole mutator of every user's memory list. Holds no list contents between calls.
#[derive(Clone)]
pub struct MemoryStore {
    store: Arc<dyn DocumentStore>,
}

impl MemoryStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Append `record` at the tail, creating the list if needed.
    ///
    /// Uses the store's atomic create-or-append, so concurrent first appends for the
    /// same key do not overwrite each other.
    pub fn append(&self, key: &StorageKey, record: &str) -> AppendOutcome {
        let value = Value::String(record.to_string());
        match self.store.append_or_create(key.as_str(), ROOT, &value) {
            Ok(len) => {
                tracing::debug!(key = %key, len, "memory appended");
                AppendOutcome::Stored {
                    record: record.to_string(),
                    stored_at: chrono::Utc::now(),
                    len,
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "append failed");
                AppendOutcome::StoreError {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Remove the item currently at `index`.
    pub fn remove_at(&self, key: &StorageKey, index: i64) -> RemoveOutcome {
        match self.store.remove_from_array(key.as_str(), ROOT, index) {
            Ok(Some(removed)) => {
                tracing::debug!(key = %key, index, "memory removed");
                RemoveOutcome::Removed {
                    index,
                    record: item_text(removed),
                }
            }
            Ok(None) => RemoveOutcome::NotFound { index },
            Err(e) => {
                tracing::warn!(key = %key, index, error = %e, "remove failed");
                RemoveOutcome::StoreError {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Read the whole list. Always goes to the store.
    pub fn recall(&self, key: &StorageKey) -> RecallOutcome {
        match self.read_items(key) {
            Ok(items) => RecallOutcome::Items { items },
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "recall failed");
                RecallOutcome::StoreError {
                    message: e.to_string(),
                }
            }
        }
    }

    fn read_items(&self, key: &StorageKey) -> Result<Vec<String>, StoreError> {
        match self.store.get_document(key.as_str(), ROOT)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.into_iter().map(item_text).collect()),
            Some(_) => Err(StoreError::NotAnArray {
                key: key.to_string(),
                path: ROOT.to_string(),
            }),
        }
    }
}

/// Items are strings; anything else written by a foreign client shows as JSON text.
fn item_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
