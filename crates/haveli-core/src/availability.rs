//! # Availability Resolver
//!
//! Pure date-overlap logic: which rooms can take a new stay over a requested
//! range, and which room types still have at least one such room.
//!
//! ## Overlap Rule
//! Stays are half-open intervals `[check_in, check_out)` — the check-out day
//! is free for the next arrival. Two stays on the same room conflict iff
//!
//! ```text
//! existing.check_in < new.check_out  AND  existing.check_out > new.check_in
//! ```
//!
//! Bookings in a terminal state (CANCELLED, CHECKED_OUT, NO_SHOW) never
//! block a room.
//!
//! ## Two Policies, Two Functions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  guest_availability   room must be AVAILABLE                            │
//! │                       (public booking site: only sell pristine rooms)  │
//! │                                                                         │
//! │  walk_in_rooms        room must not be MAINTENANCE                      │
//! │                       (front desk: a room in CLEANING can be assigned  │
//! │                        for tonight; housekeeping turns it over first)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The asymmetry is intentional and mirrors the two call sites; keeping them
//! as separate named functions keeps the intent visible where they're called.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{Booking, Room, RoomStatus, RoomType, RoomTypeAvailability};
use crate::validation::{validate_date_range, ValidationResult};

/// Number of nights in a stay.
///
/// Dates carry no time component, so this is the exact day difference.
/// Fails when `check_out <= check_in`.
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> ValidationResult<i64> {
    validate_date_range(check_in, check_out)?;
    Ok((check_out - check_in).num_days())
}

/// Half-open interval overlap between two stays.
#[inline]
pub fn overlaps(
    existing_in: NaiveDate,
    existing_out: NaiveDate,
    new_in: NaiveDate,
    new_out: NaiveDate,
) -> bool {
    existing_in < new_out && existing_out > new_in
}

/// True when any non-terminal booking on `room_id` overlaps the requested
/// range.
pub fn room_has_conflict(
    room_id: &str,
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> bool {
    bookings.iter().any(|booking| {
        booking.room_id == room_id
            && !booking.status.is_terminal()
            && overlaps(booking.check_in, booking.check_out, check_in, check_out)
    })
}

/// Guest-facing availability: room types that can host `guests_count` with
/// at least one AVAILABLE, conflict-free room, each priced for the stay.
///
/// ## Algorithm
/// 1. Reject `check_out <= check_in`; compute nights
/// 2. Keep room types with `capacity >= guests_count`
/// 3. Keep rooms of those types with `status == AVAILABLE` and no
///    overlapping non-terminal booking
/// 4. Drop types with no surviving rooms; price the rest at
///    `base_price × nights`
pub fn guest_availability(
    room_types: &[RoomType],
    rooms: &[Room],
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests_count: u32,
) -> ValidationResult<Vec<RoomTypeAvailability>> {
    let stay_nights = nights(check_in, check_out)?;

    let mut results = Vec::new();
    for room_type in room_types.iter().filter(|rt| rt.capacity >= guests_count) {
        let available_rooms: Vec<Room> = rooms
            .iter()
            .filter(|room| {
                room.type_id == room_type.id
                    && room.status == RoomStatus::Available
                    && !room_has_conflict(&room.id, bookings, check_in, check_out)
            })
            .cloned()
            .collect();

        if !available_rooms.is_empty() {
            results.push(RoomTypeAvailability {
                room_type: room_type.clone(),
                available_rooms,
                total_price: room_type.base_price * stay_nights,
            });
        }
    }
    Ok(results)
}

/// Staff walk-in availability: every conflict-free room that is not under
/// MAINTENANCE. A room still in CLEANING is assignable for tonight.
pub fn walk_in_rooms(
    rooms: &[Room],
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> ValidationResult<Vec<Room>> {
    validate_date_range(check_in, check_out)?;

    Ok(rooms
        .iter()
        .filter(|room| {
            room.status != RoomStatus::Maintenance
                && !room_has_conflict(&room.id, bookings, check_in, check_out)
        })
        .cloned()
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
