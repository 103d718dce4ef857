//! # haveli-store: Persistence Layer for Haveli PMS
//!
//! This crate provides the persistent store for the Haveli PMS system: a
//! key-value medium holding one JSON document per collection, with the store
//! on top owning every read and write.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Haveli PMS Data Flow                              │
//! │                                                                         │
//! │  Service call (check_in, add_line_item, ...)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   haveli-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │ StorageMedium │    │     Seed     │  │   │
//! │  │   │  (store.rs)   │◄───│  (medium.rs)  │    │  (seed.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ collections   │    │ MemoryMedium  │    │ room types   │  │   │
//! │  │   │ audit + seq   │    │ JsonFileMedium│    │ room list    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Data directory (JSON files)                    │   │
//! │  │   rooms.json  bookings.json  folios.json  audit_logs.json  ... │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`medium`] - The key-value seam and its two implementations
//! - [`store`] - The repository over all collections
//! - [`seed`] - First-run room inventory
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use haveli_store::{JsonFileMedium, Store};
//!
//! let store = Store::new(Arc::new(JsonFileMedium::new("./data")));
//! store.initialize().await?;
//! let rooms = store.get_rooms().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod medium;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use medium::{keys, JsonFileMedium, MemoryMedium, StorageMedium};
pub use store::Store;
