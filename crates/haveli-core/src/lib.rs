//! # haveli-core: Pure Business Logic for Haveli PMS
//!
//! This crate is the **heart** of Haveli PMS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Haveli PMS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI (booking site / admin dashboard)                │   │
//! │  │    Availability ──► New Booking ──► Check-in ──► Folio ──► Bill │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    haveli-ops (services)                        │   │
//! │  │    BookingService, FolioService, front-desk reports             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ haveli-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌─────────┐ ┌─────────┐ ┌──────────────────┐    │   │
//! │  │   │  types   │ │  money  │ │  folio  │ │  availability    │    │   │
//! │  │   │ Booking  │ │  Money  │ │ recalc  │ │  overlap rules   │    │   │
//! │  │   │  Folio   │ │ Percent │ │ formula │ │  two policies    │    │   │
//! │  │   └──────────┘ └─────────┘ └─────────┘ └──────────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO PERSISTENCE • NO CLOCK READS • PURE FUNCTIONS    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 haveli-store (persistence)                      │   │
//! │  │        JSON key-value documents, audit log, sequence            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Booking, Folio, Payment, AuditLog, ...)
//! - [`money`] - Money/Percent with integer arithmetic (no floating point!)
//! - [`folio`] - The folio recalculation routine
//! - [`availability`] - Overlap detection and the two availability policies
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - dates and timestamps are passed in
//! 2. **No I/O**: persistence, network and clock access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are paise (i64), rates are bps
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod error;
pub mod folio;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use haveli_core::Money` instead of
// `use haveli_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for human-shareable booking codes: `HMS-{year}-{seq:06}`.
pub const BOOKING_CODE_PREFIX: &str = "HMS";

/// How many audit entries the store retains, newest-first.
///
/// Older entries are dropped FIFO on append. A server-backed deployment
/// would replace the cap with an archival policy; the cutoff is named here
/// so that decision has exactly one place to change.
pub const AUDIT_LOG_RETENTION: usize = 500;

/// Maximum quantity on a single folio line item.
///
/// ## Business Reason
/// Catches fat-fingered entries (typing 1000 instead of 10) before they
/// inflate a bill.
pub const MAX_LINE_ITEM_QUANTITY: i64 = 999;

/// Formats a booking code from a year and a persisted sequence number.
///
/// ## Example
/// ```rust
/// assert_eq!(haveli_core::booking_code(2026, 5), "HMS-2026-000005");
/// ```
pub fn booking_code(year: i32, sequence: u64) -> String {
    format!("{BOOKING_CODE_PREFIX}-{year}-{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_code_format() {
        assert_eq!(booking_code(2026, 5), "HMS-2026-000005");
        assert_eq!(booking_code(2027, 123_456), "HMS-2027-123456");
        // Sequences past six digits widen rather than truncate.
        assert_eq!(booking_code(2026, 1_000_000), "HMS-2026-1000000");
    }
}
