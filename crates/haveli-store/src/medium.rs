//! # Storage Medium
//!
//! The key-value seam underneath the store: one JSON document per stable
//! key, loaded and saved whole.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     StorageMedium Seam                                  │
//! │                                                                         │
//! │  Store ──► StorageMedium::load("bookings") ──► Option<String>           │
//! │        ──► StorageMedium::save("bookings", json) ──► ()                 │
//! │                                                                         │
//! │  MemoryMedium     deterministic unit tests, no disk                    │
//! │  JsonFileMedium   one <key>.json per key under a data directory        │
//! │                                                                         │
//! │  A multi-terminal deployment would add a versioned medium here         │
//! │  (compare-and-swap per key) without touching the Store above it.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreResult;

// =============================================================================
// Stable Keys
// =============================================================================

/// The persisted state layout. Key names are part of the on-disk format and
/// must not change.
pub mod keys {
    pub const ROOM_TYPES: &str = "room_types";
    pub const ROOMS: &str = "rooms";
    pub const BOOKINGS: &str = "bookings";
    pub const GUESTS: &str = "guests";
    pub const FOLIOS: &str = "folios";
    pub const PAYMENTS: &str = "payments";
    pub const AUDIT_LOGS: &str = "audit_logs";
    pub const BOOKING_SEQUENCE: &str = "booking_sequence";
    pub const INITIALIZED: &str = "initialized";
}

// =============================================================================
// Medium Trait
// =============================================================================

/// A key-value document medium. `load` returns `None` for a key that was
/// never written; `save` replaces the whole document.
#[async_trait]
pub trait StorageMedium: Send + Sync {
    async fn load(&self, key: &str) -> StoreResult<Option<String>>;
    async fn save(&self, key: &str, document: &str) -> StoreResult<()>;
}

// =============================================================================
// In-Memory Medium
// =============================================================================

/// A medium that lives and dies with the process. Used by every unit test
/// and useful for demo sessions.
#[derive(Default)]
pub struct MemoryMedium {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageMedium for MemoryMedium {
    async fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.documents.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, document: &str) -> StoreResult<()> {
        self.documents
            .lock()
            .await
            .insert(key.to_string(), document.to_string());
        Ok(())
    }
}

// =============================================================================
// JSON File Medium
// =============================================================================

/// One `<key>.json` file per key under a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous document intact rather than a
/// truncated one.
pub struct JsonFileMedium {
    dir: PathBuf,
}

impl JsonFileMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageMedium for JsonFileMedium {
    async fn load(&self, key: &str) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(document) => Ok(Some(document)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, key: &str, document: &str) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, document).await?;
        tokio::fs::rename(&tmp, &target).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
