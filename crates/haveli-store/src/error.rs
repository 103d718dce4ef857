//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the key / entity context              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OpsError (haveli-ops) ← What service callers see                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the store.
    ///
    /// ## When This Occurs
    /// - Updating a room/booking/folio/guest/payment whose id is absent
    /// - Reading a single entity by a stale id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The underlying medium failed to read or write.
    #[error("storage medium error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document under `key` no longer parses as its collection.
    ///
    /// ## When This Occurs
    /// - Hand-edited data files
    /// - A partially written document from a crashed process predating the
    ///   atomic-rename write path
    #[error("corrupt document under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Corrupt error for a given key.
    pub fn corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Corrupt {
            key: key.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("Folio", "f-9");
        assert_eq!(err.to_string(), "Folio not found: f-9");
    }
}
