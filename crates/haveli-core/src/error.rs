//! # Error Types
//!
//! Domain-specific error types for haveli-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  haveli-core errors (this file)                                        │
//! │  ├── CoreError        - NotFound / InvalidState / Validation           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  haveli-store errors (separate crate)                                  │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  haveli-ops errors (separate crate)                                    │
//! │  └── OpsError         - What service callers see                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OpsError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity, id, state)
//! 3. Errors are enum variants, never String
//! 4. Every failure is scoped to the single requested operation

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Maps one-to-one onto the domain taxonomy: a referenced id is absent, an
/// operation is attempted from the wrong lifecycle state, or input is
/// malformed. All are surfaced synchronously; none leave partial state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced entity (room/booking/folio/guest/payment) is absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Operation attempted from an invalid lifecycle state.
    ///
    /// ## When This Occurs
    /// - Cancelling an in-house booking ("check out first")
    /// - Removing the protected ROOM_CHARGE line item
    #[error("{0}")]
    InvalidState(String),

    /// Malformed input to a creation/update call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an InvalidState error with a human-readable reason.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        CoreError::InvalidState(reason.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. The input is
/// rejected before any state change happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Check-out is not strictly after check-in.
    #[error("check-out date must be after check-in date")]
    InvalidDateRange,

    /// Party is larger than the room type sleeps.
    #[error("party of {requested} exceeds room capacity of {capacity}")]
    OverCapacity { requested: u32, capacity: u32 },

    /// Invalid format (bad id, malformed value).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found("Booking", "b-42");
        assert_eq!(err.to_string(), "Booking not found: b-42");

        let err = CoreError::invalid_state("Cannot cancel a checked-in booking");
        assert_eq!(err.to_string(), "Cannot cancel a checked-in booking");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "guest name" };
        assert_eq!(err.to_string(), "guest name is required");

        let err = ValidationError::OverCapacity {
            requested: 5,
            capacity: 3,
        };
        assert_eq!(err.to_string(), "party of 5 exceeds room capacity of 3");

        assert_eq!(
            ValidationError::InvalidDateRange.to_string(),
            "check-out date must be after check-in date"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "phone" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
