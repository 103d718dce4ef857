//! # Service Error Types
//!
//! The single error surface service callers see.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  ├──► OpsError ──► caller / UI toast    │
//! │  StoreError ─────────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal to the process; every failure is scoped to the
//! single requested operation and no partial mutation is left behind.

use haveli_core::{CoreError, ValidationError};
use haveli_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the booking and billing services.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Domain rule failure: not found, invalid state, or bad input.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure underneath an otherwise valid operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for OpsError {
    fn from(err: ValidationError) -> Self {
        OpsError::Core(CoreError::Validation(err))
    }
}

impl OpsError {
    /// Creates an InvalidState error with a human-readable reason.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        OpsError::Core(CoreError::invalid_state(reason))
    }

    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        OpsError::Core(CoreError::not_found(entity, id))
    }

    /// True for any absent-id failure, from either layer.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            OpsError::Core(CoreError::NotFound { .. }) | OpsError::Store(StoreError::NotFound { .. })
        )
    }

    /// True for lifecycle-state rejections.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, OpsError::Core(CoreError::InvalidState(_)))
    }

    /// True for rejected input.
    pub fn is_validation(&self) -> bool {
        matches!(self, OpsError::Core(CoreError::Validation(_)))
    }
}

/// Result type for service operations.
pub type OpsResult<T> = Result<T, OpsError>;
