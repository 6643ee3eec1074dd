//! Process-local document store. Contents are lost when the process exits.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::path::{self, JsonPath};
use super::{DocumentStore, StoreError};

/// `HashMap`-backed store. Every primitive holds the lock for its whole duration.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: Mutex<HashMap<String, Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Value>>, StoreError> {
        self.docs.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn get_document(&self, key: &str, path: &str) -> Result<Option<Value>, StoreError> {
        let path = JsonPath::parse(path)?;
        let docs = self.lock()?;
        Ok(docs.get(key).and_then(|doc| path.resolve(doc)).cloned())
    }

    fn set_document(&self, key: &str, raw_path: &str, value: &Value) -> Result<(), StoreError> {
        let path = JsonPath::parse(raw_path)?;
        let mut docs = self.lock()?;
        if path.is_root() {
            docs.insert(key.to_string(), value.clone());
            return Ok(());
        }
        let doc = docs
            .get_mut(key)
            .ok_or_else(|| StoreError::NoSuchKey(key.to_string()))?;
        path::set_in(doc, key, &path, raw_path, value.clone())
    }

    fn append_to_array(
        &self,
        key: &str,
        raw_path: &str,
        value: &Value,
    ) -> Result<usize, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        let mut docs = self.lock()?;
        let doc = docs
            .get_mut(key)
            .ok_or_else(|| StoreError::NoSuchKey(key.to_string()))?;
        path::append_in(doc, key, &path, raw_path, value.clone())
    }

    fn remove_from_array(
        &self,
        key: &str,
        raw_path: &str,
        index: i64,
    ) -> Result<Option<Value>, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        let mut docs = self.lock()?;
        match docs.get_mut(key) {
            Some(doc) => path::remove_in(doc, key, &path, raw_path, index),
            None => Ok(None),
        }
    }

    fn append_or_create(
        &self,
        key: &str,
        raw_path: &str,
        value: &Value,
    ) -> Result<usize, StoreError> {
        let path = JsonPath::parse(raw_path)?;
        let mut docs = self.lock()?;
        match docs.get_mut(key) {
            Some(doc) => path::append_in(doc, key, &path, raw_path, value.clone()),
            None if path.is_root() => {
                docs.insert(key.to_string(), Value::Array(vec![value.clone()]));
                Ok(1)
            }
            None => Err(StoreError::NoSuchKey(key.to_string())),
        }
    }
}
