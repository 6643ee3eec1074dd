//! Minimal JSON path support for document primitives.
//!
//! Accepts `$` followed by any chain of `.field` and `[n]` segments, which is the
//! subset every backend understands.

use serde_json::Value;

use super::StoreError;

/// The document root.
pub const ROOT: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// A parsed JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let unsupported = || StoreError::UnsupportedPath(path.to_string());

        let mut rest = path.strip_prefix('$').ok_or_else(unsupported)?;
        let mut segments = Vec::new();

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                if end == 0 {
                    return Err(unsupported());
                }
                segments.push(Segment::Field(after[..end].to_string()));
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').ok_or_else(unsupported)?;
                let index = after[..end].parse::<usize>().map_err(|_| unsupported())?;
                segments.push(Segment::Index(index));
                rest = &after[end + 1..];
            } else {
                return Err(unsupported());
            }
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Value addressed by this path, if present.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(doc, |node, seg| match seg {
            Segment::Field(name) => node.as_object()?.get(name),
            Segment::Index(i) => node.as_array()?.get(*i),
        })
    }

    pub fn resolve_mut<'a>(&self, doc: &'a mut Value) -> Option<&'a mut Value> {
        self.segments.iter().try_fold(doc, |node, seg| match seg {
            Segment::Field(name) => node.as_object_mut()?.get_mut(name),
            Segment::Index(i) => node.as_array_mut()?.get_mut(*i),
        })
    }
}

/// Append `value` to the array at `path` inside `doc`. Returns the new length.
pub(crate) fn append_in(
    doc: &mut Value,
    key: &str,
    path: &JsonPath,
    raw_path: &str,
    value: Value,
) -> Result<usize, StoreError> {
    let target = path.resolve_mut(doc).ok_or_else(|| StoreError::PathNotFound {
        key: key.to_string(),
        path: raw_path.to_string(),
    })?;
    let array = target.as_array_mut().ok_or_else(|| StoreError::NotAnArray {
        key: key.to_string(),
        path: raw_path.to_string(),
    })?;
    array.push(value);
    Ok(array.len())
}

/// Remove the element at `index` from the array at `path`. Out-of-range or negative
/// indices yield `Ok(None)`.
pub(crate) fn remove_in(
    doc: &mut Value,
    key: &str,
    path: &JsonPath,
    raw_path: &str,
    index: i64,
) -> Result<Option<Value>, StoreError> {
    let Some(target) = path.resolve_mut(doc) else {
        return Ok(None);
    };
    let array = target.as_array_mut().ok_or_else(|| StoreError::NotAnArray {
        key: key.to_string(),
        path: raw_path.to_string(),
    })?;
    match usize::try_from(index) {
        Ok(i) if i < array.len() => Ok(Some(array.remove(i))),
        _ => Ok(None),
    }
}

/// Replace the value at `path`, or the whole document when `path` is the root.
pub(crate) fn set_in(
    doc: &mut Value,
    key: &str,
    path: &JsonPath,
    raw_path: &str,
    value: Value,
) -> Result<(), StoreError> {
    let target = path.resolve_mut(doc).ok_or_else(|| StoreError::PathNotFound {
        key: key.to_string(),
        path: raw_path.to_string(),
    })?;
    *target = value;
    Ok(())
}
