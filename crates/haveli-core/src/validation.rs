//! # Validation Module
//!
//! Input validation for the booking and billing services.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                     │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (called by haveli-ops services)                  │
//! │  ├── Date-range rules, party size vs capacity                          │
//! │  └── Amount/quantity/percent bounds                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: The store stays caller-trusting by design; invariants        │
//! │           are enforced before anything is written                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{Money, Percent};
use crate::types::NewGuest;
use crate::MAX_LINE_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a stay date range.
///
/// ## Rules
/// - `check_out` must be strictly after `check_in` (a stay is at least one
///   night; same-day check-out is rejected)
pub fn validate_date_range(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<()> {
    if check_out <= check_in {
        return Err(ValidationError::InvalidDateRange);
    }
    Ok(())
}

// =============================================================================
// Guest Validators
// =============================================================================

/// Validates the required guest fields at booking creation.
///
/// ## Rules
/// - Name must not be empty
/// - Phone must not be empty
///
/// Email, city and id-proof stay optional; the reference system never
/// required them at the desk.
pub fn validate_guest(guest: &NewGuest) -> ValidationResult<()> {
    if guest.name.trim().is_empty() {
        return Err(ValidationError::Required { field: "guest name" });
    }
    if guest.phone.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "guest phone",
        });
    }
    Ok(())
}

/// Validates party size against a room type's capacity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed the room type's capacity
pub fn validate_party_size(guests_count: u32, capacity: u32) -> ValidationResult<()> {
    if guests_count == 0 {
        return Err(ValidationError::Required {
            field: "guests count",
        });
    }
    if guests_count > capacity {
        return Err(ValidationError::OverCapacity {
            requested: guests_count,
            capacity,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }
    if qty > MAX_LINE_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            min: 1,
            max: MAX_LINE_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a unit price or discount amount.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: complimentary items, no flat
///   discount)
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "amount",
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a payment amount.
///
/// ## Rules
/// - Must be strictly positive; refunds are modelled as payment deletion,
///   not negative payments
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount",
        });
    }
    Ok(())
}

/// Validates a percentage rate (discount or tax).
///
/// ## Rules
/// - Must be between 0 and 10000 bps (0% to 100%)
pub fn validate_percent(rate: Percent) -> ValidationResult<()> {
    if rate.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "percent",
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(date(2026, 3, 1), date(2026, 3, 3)).is_ok());
        // Same day is not a stay.
        assert!(validate_date_range(date(2026, 3, 1), date(2026, 3, 1)).is_err());
        assert!(validate_date_range(date(2026, 3, 3), date(2026, 3, 1)).is_err());
    }

    #[test]
    fn test_validate_guest() {
        let mut guest = NewGuest {
            name: "Rajesh Kumar".into(),
            phone: "9876543210".into(),
            email: None,
            city: None,
            id_proof: None,
        };
        assert!(validate_guest(&guest).is_ok());

        guest.name = "   ".into();
        assert!(validate_guest(&guest).is_err());

        guest.name = "Rajesh Kumar".into();
        guest.phone = String::new();
        assert!(validate_guest(&guest).is_err());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(2, 3).is_ok());
        assert!(validate_party_size(3, 3).is_ok());
        assert!(validate_party_size(0, 3).is_err());
        assert!(validate_party_size(4, 3).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_amount(Money::zero()).is_ok());
        assert!(validate_amount(Money::from_rupees(500)).is_ok());
        assert!(validate_amount(Money::from_rupees(-1)).is_err());

        assert!(validate_payment_amount(Money::from_rupees(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_rupees(-1)).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent(Percent::zero()).is_ok());
        assert!(validate_percent(Percent::from_bps(10_000)).is_ok());
        assert!(validate_percent(Percent::from_bps(10_001)).is_err());
    }
}
