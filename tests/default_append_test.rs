mod helpers;

use helpers::{items, key_for};
use memlog::memory::{AppendOutcome, MemoryStore};
use memlog::store::memory::InMemoryDocumentStore;
use memlog::store::{DocumentStore, StoreError};
use serde_json::{json, Value};
use std::sync::{Arc, Barrier};
use std::thread;

/// Forwards the five basic primitives and keeps the trait's two-call `append_or_create`.
/// With a barrier, every `exists` call waits until all writers have checked.
struct TwoStep {
    inner: InMemoryDocumentStore,
    checkpoint: Option<Barrier>,
}

impl TwoStep {
    fn new() -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            checkpoint: None,
        }
    }

    fn lockstep(writers: usize) -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            checkpoint: Some(Barrier::new(writers)),
        }
    }
}

impl DocumentStore for TwoStep {
    fn backend(&self) -> &'static str {
        "two-step"
    }
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let found = self.inner.exists(key)?;
        if let Some(barrier) = &self.checkpoint {
            barrier.wait();
        }
        Ok(found)
    }
    fn get_document(&self, key: &str, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get_document(key, path)
    }
    fn set_document(&self, key: &str, path: &str, value: &Value) -> Result<(), StoreError> {
        self.inner.set_document(key, path, value)
    }
    fn append_to_array(&self, key: &str, path: &str, value: &Value) -> Result<usize, StoreError> {
        self.inner.append_to_array(key, path, value)
    }
    fn remove_from_array(&self, key: &str, path: &str, index: i64) -> Result<Option<Value>, StoreError> {
        self.inner.remove_from_array(key, path, index)
    }
}

#[test]
fn creates_list_then_appends() {
    let store = TwoStep::new();

    assert_eq!(store.append_or_create("memory:ada", "$", &json!("1")).unwrap(), 1);
    assert_eq!(store.get_document("memory:ada", "$").unwrap(), Some(json!(["1"])));

    assert_eq!(store.append_or_create("memory:ada", "$", &json!("2")).unwrap(), 2);
    assert_eq!(store.get_document("memory:ada", "$").unwrap(), Some(json!(["1", "2"])));
}

#[test]
fn memory_store_works_over_two_step_append() {
    let memory = MemoryStore::new(Arc::new(TwoStep::new()));
    let key = key_for("ada@example.com");

    memory.append(&key, "likes tea");
    memory.append(&key, "works at Acme");

    assert_eq!(items(&memory, &key), ["likes tea", "works at Acme"]);
}

/// Both writers see an absent key, both write a fresh one-element list, and the
/// first write is overwritten.
#[test]
fn simultaneous_first_appends_lose_one_record() {
    let memory = MemoryStore::new(Arc::new(TwoStep::lockstep(2)));
    let key = key_for("race@example.com");

    let handles: Vec<_> = ["first", "second"]
        .into_iter()
        .map(|record| {
            let memory = memory.clone();
            let key = key.clone();
            thread::spawn(move || memory.append(&key, record))
        })
        .collect();

    for handle in handles {
        // Each writer believes it created the list.
        match handle.join().unwrap() {
            AppendOutcome::Stored { len, .. } => assert_eq!(len, 1),
            other => panic!("append failed: {other:?}"),
        }
    }

    let survivors = items(&memory, &key);
    assert_eq!(survivors.len(), 1);
    assert!(survivors[0] == "first" || survivors[0] == "second");
}
