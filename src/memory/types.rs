//! Outcome types for memory list operations.
//!
//! Every operation reports success, a normal empty result, or a store failure as an
//! explicit variant. Store failures carry the underlying error message verbatim.

use chrono::{DateTime, SecondsFormat, Utc};

/// Result of appending one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Stored {
        record: String,
        /// Captured after the store write completed. Not persisted.
        stored_at: DateTime<Utc>,
        /// List length after the append.
        len: usize,
    },
    StoreError { message: String },
}

impl AppendOutcome {
    /// ISO-8601 UTC text of the capture time, if the append succeeded.
    pub fn timestamp(&self) -> Option<String> {
        match self {
            Self::Stored { stored_at, .. } => {
                Some(stored_at.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Self::StoreError { .. } => None,
        }
    }
}

/// Result of removing the item at an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { index: i64, record: String },
    /// Absent list or index outside the current bounds.
    NotFound { index: i64 },
    StoreError { message: String },
}

/// Result of reading a whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecallOutcome {
    /// Items in insertion order. Empty when the list is absent or emptied.
    Items { items: Vec<String> },
    StoreError { message: String },
}

impl RecallOutcome {
    pub fn items(&self) -> Option<&[String]> {
        match self {
            Self::Items { items } => Some(items),
            Self::StoreError { .. } => None,
        }
    }
}
