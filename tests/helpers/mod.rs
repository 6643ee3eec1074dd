#![allow(dead_code)]

use memlog::identity::{derive_key, StorageKey, UserIdentity};
use memlog::memory::{MemoryStore, RecallOutcome};
use memlog::store::memory::InMemoryDocumentStore;
use memlog::store::sqlite::SqliteDocumentStore;
use memlog::store::DocumentStore;
use std::sync::Arc;

/// A fresh in-memory SQLite store with schema applied.
pub fn sqlite_store() -> Arc<dyn DocumentStore> {
    Arc::new(SqliteDocumentStore::in_memory().unwrap())
}

pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(InMemoryDocumentStore::new())
}

/// One fresh store per shipped backend.
pub fn all_backends() -> Vec<Arc<dyn DocumentStore>> {
    vec![sqlite_store(), memory_store()]
}

pub fn key_for(user: &str) -> StorageKey {
    derive_key(&UserIdentity::new(user).unwrap())
}

/// Recall and unwrap the items, panicking on a store error.
pub fn items(memory: &MemoryStore, key: &StorageKey) -> Vec<String> {
    match memory.recall(key) {
        RecallOutcome::Items { items } => items,
        other => panic!("recall failed: {other:?}"),
    }
}
