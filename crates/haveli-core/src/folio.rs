//! # Folio Arithmetic
//!
//! The single recalculation routine for folio totals, plus the constructors
//! the booking flow uses to open a folio.
//!
//! ## The Recalculation Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal        = Σ line_item.total                                    │
//! │  discount_total  = discount_amount + subtotal × (discount_percent/100)  │
//! │  after_discount  = subtotal − discount_total                            │
//! │  tax_amount      = after_discount × (tax_percent/100)                   │
//! │  grand_total     = after_discount + tax_amount                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoked after every line-item or discount mutation and nowhere else;
//! `subtotal`, `tax_amount` and `grand_total` have no other writer. An
//! independent recomputation from the folio's inputs must always reproduce
//! the stored `grand_total`.

use chrono::{DateTime, NaiveDate, Utc};

use crate::money::{Money, Percent};
use crate::types::{Folio, FolioLineItem, LineItemType};

/// Computes a line item's total: `quantity × unit_price`.
#[inline]
pub fn line_total(quantity: i64, unit_price: Money) -> Money {
    unit_price.multiply_quantity(quantity)
}

/// Recomputes `subtotal`, `tax_amount` and `grand_total` from the folio's
/// line items and discount/tax fields, stamping `updated_at`.
///
/// The timestamp is passed in rather than read from the clock so the routine
/// stays pure.
pub fn recalculate(folio: &mut Folio, now: DateTime<Utc>) {
    let subtotal: Money = folio.line_items.iter().map(|item| item.total).sum();
    let discount_total = folio.discount_amount + subtotal.percent_of(folio.discount_percent);
    let after_discount = subtotal - discount_total;

    folio.subtotal = subtotal;
    folio.tax_amount = after_discount.percent_of(folio.tax_percent);
    folio.grand_total = after_discount + folio.tax_amount;
    folio.updated_at = now;
}

/// Builds the system-created ROOM_CHARGE line item for a new booking:
/// one unit per night at the daily rate.
pub fn room_charge_item(
    id: String,
    folio_id: String,
    nights: i64,
    daily_rate: Money,
    check_in: NaiveDate,
) -> FolioLineItem {
    let plural = if nights > 1 { "s" } else { "" };
    FolioLineItem {
        id,
        folio_id,
        kind: LineItemType::RoomCharge,
        description: format!("Room Charges ({nights} night{plural})"),
        quantity: nights,
        unit_price: daily_rate,
        total: line_total(nights, daily_rate),
        date: check_in,
    }
}

/// Opens a folio for a booking, seeded with its ROOM_CHARGE item and zero
/// discount and tax. Totals are recalculated before the folio is returned.
pub fn open_folio(
    id: String,
    booking_id: String,
    room_charge: FolioLineItem,
    now: DateTime<Utc>,
) -> Folio {
    let mut folio = Folio {
        id,
        booking_id,
        line_items: vec![room_charge],
        subtotal: Money::zero(),
        discount_amount: Money::zero(),
        discount_percent: Percent::zero(),
        tax_amount: Money::zero(),
        tax_percent: Percent::zero(),
        grand_total: Money::zero(),
        created_at: now,
        updated_at: now,
    };
    recalculate(&mut folio, now);
    folio
}

// =============================================================================
// Unit Tests
// =============================================================================
