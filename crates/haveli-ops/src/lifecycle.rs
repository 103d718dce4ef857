//! # Booking Lifecycle Service
//!
//! Orchestrates the booking state machine and its side effects.
//!
//! ## State Machine
//! ```text
//! RESERVED ──confirm──► CONFIRMED ──check_in──► IN_HOUSE ──check_out──► CHECKED_OUT
//!    │                      │                      ▲ room → OCCUPIED       room → CLEANING
//!    └──────cancel──────────┴──► CANCELLED         │
//!    RESERVED/CONFIRMED ──mark_no_show──► NO_SHOW  └── cancel REFUSED here
//! ```
//!
//! Every successful mutation appends exactly one audit entry; a failed call
//! appends none and changes nothing. The service validates its input before
//! the first write so failures are all-or-nothing.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use haveli_core::availability::{guest_availability, nights, walk_in_rooms};
use haveli_core::folio::{open_folio, room_charge_item};
use haveli_core::validation::{validate_date_range, validate_guest, validate_party_size};
use haveli_core::{
    booking_code, AuditAction, AuditEntityType, Booking, BookingPatch, BookingStatus, BookingType,
    Money, NewAuditEntry, NewGuest, PaymentStatus, Room, RoomStatus, RoomTypeAvailability,
};
use haveli_store::Store;

use crate::error::OpsResult;

// =============================================================================
// Requests & Filters
// =============================================================================

/// Everything the front desk (or the public booking flow) supplies to open
/// a stay.
#[derive(Debug, Clone)]
pub struct CreateStayRequest {
    pub guest: NewGuest,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests_count: u32,
    /// Nightly rate for this stay; normally the room type's base price, but
    /// the desk may negotiate.
    pub daily_rate: Money,
    pub booking_type: BookingType,
    pub notes: Option<String>,
}

/// Booking list filters. All optional; absent filters match everything.
#[derive(Debug, Clone, Default)]
pub struct BookingFilters {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive match on booking code, guest name or phone.
    pub search: Option<String>,
    /// Check-in date window, inclusive.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

// =============================================================================
// Booking Service
// =============================================================================

/// The booking lifecycle service.
///
/// `operator` is the opaque identity (from whatever session layer sits
/// above) stamped into `created_by` on every audit entry.
pub struct BookingService {
    store: Arc<Store>,
    operator: String,
}

impl BookingService {
    pub fn new(store: Arc<Store>, operator: impl Into<String>) -> Self {
        BookingService {
            store,
            operator: operator.into(),
        }
    }

    fn audit(&self, action: AuditAction, entity_id: &str, description: String) -> NewAuditEntry {
        NewAuditEntry {
            action,
            entity_type: AuditEntityType::Booking,
            entity_id: entity_id.to_string(),
            description,
            reason: None,
            previous_value: None,
            new_value: None,
            created_by: self.operator.clone(),
        }
    }

    // =========================================================================
    // Availability
    // =========================================================================

    /// Guest-facing availability: room types with at least one AVAILABLE,
    /// conflict-free room for the range and party size.
    pub async fn check_availability(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests_count: u32,
    ) -> OpsResult<Vec<RoomTypeAvailability>> {
        let room_types = self.store.get_room_types().await?;
        let rooms = self.store.get_rooms().await?;
        let bookings = self.store.get_bookings().await?;
        Ok(guest_availability(
            &room_types,
            &rooms,
            &bookings,
            check_in,
            check_out,
            guests_count,
        )?)
    }

    /// Staff walk-in availability: conflict-free rooms that are not under
    /// maintenance (a room still in CLEANING can be assigned).
    pub async fn available_rooms_for_walk_in(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> OpsResult<Vec<Room>> {
        let rooms = self.store.get_rooms().await?;
        let bookings = self.store.get_bookings().await?;
        Ok(walk_in_rooms(&rooms, &bookings, check_in, check_out)?)
    }

    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    /// Creates guest, booking and folio together.
    ///
    /// The folio opens with the system ROOM_CHARGE line item (one unit per
    /// night at the daily rate). Walk-ins start CONFIRMED, reservations
    /// start RESERVED; both start with payment PENDING.
    pub async fn create_stay(&self, request: CreateStayRequest) -> OpsResult<Booking> {
        validate_date_range(request.check_in, request.check_out)?;
        validate_guest(&request.guest)?;
        let stay_nights = nights(request.check_in, request.check_out)?;

        let room = self.store.get_room(&request.room_id).await?;
        let room_type = self.store.get_room_type(&room.type_id).await?;
        validate_party_size(request.guests_count, room_type.capacity)?;

        let guest = self.store.add_guest(request.guest).await?;

        let sequence = self.store.next_booking_sequence().await?;
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            booking_code: booking_code(now.year(), sequence),
            guest_id: guest.id.clone(),
            room_id: room.id.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guests_count: request.guests_count,
            total_amount: request.daily_rate * stay_nights,
            daily_rate: request.daily_rate,
            status: match request.booking_type {
                BookingType::WalkIn => BookingStatus::Confirmed,
                BookingType::Reservation => BookingStatus::Reserved,
            },
            payment_status: PaymentStatus::Pending,
            booking_type: request.booking_type,
            notes: request.notes,
            created_at: now,
        };
        let booking = self.store.add_booking(booking).await?;

        let folio_id = Uuid::new_v4().to_string();
        let room_charge = room_charge_item(
            Uuid::new_v4().to_string(),
            folio_id.clone(),
            stay_nights,
            booking.daily_rate,
            booking.check_in,
        );
        let folio = open_folio(folio_id, booking.id.clone(), room_charge, now);
        self.store.add_folio(folio).await?;

        let kind = match booking.booking_type {
            BookingType::WalkIn => "Walk-in",
            BookingType::Reservation => "Reservation",
        };
        self.store
            .append_audit(self.audit(
                AuditAction::BookingCreated,
                &booking.id,
                format!("{kind} created for {}", guest.name),
            ))
            .await?;

        info!(
            booking = %booking.booking_code,
            room = %room.number,
            nights = stay_nights,
            total = %booking.total_amount,
            "stay created"
        );
        Ok(booking)
    }

    /// Checks a guest in: booking goes IN_HOUSE, the room goes OCCUPIED.
    ///
    /// A backdated check-in records the past event after the fact and
    /// requires a reason; its audit action is the backdated variant.
    ///
    /// Room availability is not re-verified here; the overlap check at
    /// booking creation is what guards the room.
    pub async fn check_in(
        &self,
        booking_id: &str,
        backdated: bool,
        reason: Option<String>,
    ) -> OpsResult<Booking> {
        let booking = self.store.get_booking(booking_id).await?;
        require_reason_if_backdated(backdated, &reason)?;

        let booking = self
            .store
            .update_booking(
                &booking.id,
                BookingPatch {
                    status: Some(BookingStatus::InHouse),
                    ..Default::default()
                },
            )
            .await?;
        self.store
            .update_room_status(&booking.room_id, RoomStatus::Occupied)
            .await?;

        let mut entry = self.audit(
            if backdated {
                AuditAction::BackdatedCheckIn
            } else {
                AuditAction::CheckIn
            },
            booking_id,
            if backdated {
                "Guest checked in (backdated)".to_string()
            } else {
                "Guest checked in".to_string()
            },
        );
        entry.reason = reason;
        self.store.append_audit(entry).await?;

        info!(booking = %booking.booking_code, backdated, "guest checked in");
        Ok(booking)
    }

    /// Checks a guest out: booking goes CHECKED_OUT, the room goes CLEANING,
    /// and payment status flips to PAID when the folio is fully covered.
    ///
    /// The balance is *not* a precondition here — the desk policy of
    /// blocking checkout while a balance is due belongs to the caller, which
    /// must pre-check with [`crate::billing::FolioService::balance_summary`].
    pub async fn check_out(
        &self,
        booking_id: &str,
        backdated: bool,
        reason: Option<String>,
    ) -> OpsResult<Booking> {
        let booking = self.store.get_booking(booking_id).await?;
        require_reason_if_backdated(backdated, &reason)?;

        self.store
            .update_booking(
                &booking.id,
                BookingPatch {
                    status: Some(BookingStatus::CheckedOut),
                    ..Default::default()
                },
            )
            .await?;
        self.store
            .update_room_status(&booking.room_id, RoomStatus::Cleaning)
            .await?;

        let total_billed = match self.store.folio_for_booking(booking_id).await? {
            Some(folio) => folio.grand_total,
            None => booking.total_amount,
        };
        let total_paid: Money = self
            .store
            .payments_for_booking(booking_id)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();
        if total_paid >= total_billed {
            self.store
                .update_booking(
                    booking_id,
                    BookingPatch {
                        payment_status: Some(PaymentStatus::Paid),
                        ..Default::default()
                    },
                )
                .await?;
        }

        let mut entry = self.audit(
            if backdated {
                AuditAction::BackdatedCheckOut
            } else {
                AuditAction::CheckOut
            },
            booking_id,
            if backdated {
                "Guest checked out (backdated)".to_string()
            } else {
                "Guest checked out".to_string()
            },
        );
        entry.reason = reason;
        self.store.append_audit(entry).await?;

        let booking = self.store.get_booking(booking_id).await?;
        info!(booking = %booking.booking_code, backdated, "guest checked out");
        Ok(booking)
    }

    /// Cancels a booking. An in-house booking cannot be cancelled; it has to
    /// be checked out instead.
    pub async fn cancel(&self, booking_id: &str, reason: impl Into<String>) -> OpsResult<Booking> {
        let booking = self.store.get_booking(booking_id).await?;
        if booking.status.is_in_house() {
            return Err(crate::error::OpsError::invalid_state(
                "Cannot cancel a checked-in booking. Please check out first.",
            ));
        }

        let booking = self
            .store
            .update_booking(
                booking_id,
                BookingPatch {
                    status: Some(BookingStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await?;

        let mut entry = self.audit(
            AuditAction::BookingCancelled,
            booking_id,
            "Booking cancelled".to_string(),
        );
        entry.reason = Some(reason.into());
        self.store.append_audit(entry).await?;

        info!(booking = %booking.booking_code, "booking cancelled");
        Ok(booking)
    }

    /// Marks a booking NO_SHOW. The room never changed status, so there is
    /// no room side effect.
    pub async fn mark_no_show(&self, booking_id: &str) -> OpsResult<Booking> {
        self.store.get_booking(booking_id).await?;

        let booking = self
            .store
            .update_booking(
                booking_id,
                BookingPatch {
                    status: Some(BookingStatus::NoShow),
                    ..Default::default()
                },
            )
            .await?;

        self.store
            .append_audit(self.audit(
                AuditAction::NoShowMarked,
                booking_id,
                "Guest marked as no-show".to_string(),
            ))
            .await?;

        info!(booking = %booking.booking_code, "marked no-show");
        Ok(booking)
    }

    /// Generic field patch on a booking.
    ///
    /// Moving an in-house booking to a different room additionally turns the
    /// old room over to CLEANING, occupies the new one, and records a
    /// ROOM_CHANGED entry carrying both room ids; any other patch records a
    /// plain BOOKING_UPDATED.
    pub async fn update_booking(
        &self,
        booking_id: &str,
        patch: BookingPatch,
        reason: Option<String>,
    ) -> OpsResult<Booking> {
        let before = self.store.get_booking(booking_id).await?;
        let new_room_id = patch.room_id.clone();

        let updated = self.store.update_booking(booking_id, patch).await?;

        let room_moved = new_room_id
            .as_deref()
            .is_some_and(|new_room| new_room != before.room_id && before.status.is_in_house());

        if room_moved {
            let new_room = updated.room_id.clone();
            debug!(booking = %updated.booking_code, from = %before.room_id, to = %new_room, "room move");
            self.store
                .update_room_status(&before.room_id, RoomStatus::Cleaning)
                .await?;
            self.store
                .update_room_status(&new_room, RoomStatus::Occupied)
                .await?;

            let mut entry = self.audit(
                AuditAction::RoomChanged,
                booking_id,
                "Room changed".to_string(),
            );
            entry.previous_value = Some(before.room_id.clone());
            entry.new_value = Some(new_room);
            entry.reason = reason;
            self.store.append_audit(entry).await?;
        } else {
            let mut entry = self.audit(
                AuditAction::BookingUpdated,
                booking_id,
                "Booking details updated".to_string(),
            );
            entry.reason = reason;
            self.store.append_audit(entry).await?;
        }

        Ok(updated)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn booking(&self, booking_id: &str) -> OpsResult<Booking> {
        Ok(self.store.get_booking(booking_id).await?)
    }

    /// Lookup by the human-shareable code printed on confirmations.
    pub async fn booking_by_code(&self, code: &str) -> OpsResult<Booking> {
        Ok(self.store.get_booking_by_code(code).await?)
    }

    /// Filtered booking list, newest-first.
    pub async fn bookings(&self, filters: &BookingFilters) -> OpsResult<Vec<Booking>> {
        let mut bookings = self.store.get_bookings().await?;

        if let Some(status) = filters.status {
            bookings.retain(|b| b.status == status);
        }
        if let Some(payment_status) = filters.payment_status {
            bookings.retain(|b| b.payment_status == payment_status);
        }
        if let Some(search) = &filters.search {
            let needle = search.to_lowercase();
            let guests = self.store.get_guests().await?;
            bookings.retain(|b| {
                let guest = guests.iter().find(|g| g.id == b.guest_id);
                b.booking_code.to_lowercase().contains(&needle)
                    || guest.is_some_and(|g| {
                        g.name.to_lowercase().contains(&needle) || g.phone.contains(&needle)
                    })
            });
        }
        if let Some(from) = filters.date_from {
            bookings.retain(|b| b.check_in >= from);
        }
        if let Some(to) = filters.date_to {
            bookings.retain(|b| b.check_in <= to);
        }

        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}

/// Backdated operations are recorded after the fact and must say why.
fn require_reason_if_backdated(
    backdated: bool,
    reason: &Option<String>,
) -> Result<(), haveli_core::ValidationError> {
    if backdated && reason.as_deref().map_or(true, |r| r.trim().is_empty()) {
        return Err(haveli_core::ValidationError::Required { field: "reason" });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn request(room_id: &str, booking_type: BookingType) -> CreateStayRequest {
        CreateStayRequest {
            guest: NewGuest {
                name: "Priya Sharma".into(),
                phone: "9123456780".into(),
                email: None,
                city: Some("Chennai".into()),
                id_proof: None,
            },
            room_id: room_id.into(),
            check_in: date(1),
            check_out: date(3),
            guests_count: 2,
            daily_rate: Money::from_rupees(1200),
            booking_type,
            notes: None,
        }
    }

    async fn service() -> BookingService {
        let store = Arc::new(Store::in_memory());
        store.initialize().await.unwrap();
        BookingService::new(store, "admin")
    }

    #[tokio::test]
    async fn test_create_stay_rejects_bad_input_without_writes() {
        let service = service().await;

        let mut bad_dates = request("r-101", BookingType::WalkIn);
        bad_dates.check_out = bad_dates.check_in;
        assert!(service.create_stay(bad_dates).await.unwrap_err().is_validation());

        let mut no_phone = request("r-101", BookingType::WalkIn);
        no_phone.guest.phone = String::new();
        assert!(service.create_stay(no_phone).await.unwrap_err().is_validation());

        // Standard room sleeps two.
        let mut too_many = request("r-101", BookingType::WalkIn);
        too_many.guests_count = 5;
        assert!(service.create_stay(too_many).await.unwrap_err().is_validation());

        let ghost_room = request("r-999", BookingType::WalkIn);
        assert!(service.create_stay(ghost_room).await.unwrap_err().is_not_found());

        // No booking, guest, folio or audit entry leaked out of the failures.
        assert!(service.store.get_bookings().await.unwrap().is_empty());
        assert!(service.store.get_folios().await.unwrap().is_empty());
        assert!(service.store.audit_logs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_walk_in_confirms_reservation_reserves() {
        let service = service().await;

        let walk_in = service.create_stay(request("r-101", BookingType::WalkIn)).await.unwrap();
        assert_eq!(walk_in.status, BookingStatus::Confirmed);
        assert_eq!(walk_in.payment_status, PaymentStatus::Pending);

        let reservation = service
            .create_stay(request("r-103", BookingType::Reservation))
            .await
            .unwrap();
        assert_eq!(reservation.status, BookingStatus::Reserved);
    }

    #[tokio::test]
    async fn test_booking_codes_are_sequential() {
        let service = service().await;
        let first = service.create_stay(request("r-101", BookingType::WalkIn)).await.unwrap();
        let second = service.create_stay(request("r-103", BookingType::WalkIn)).await.unwrap();

        assert!(first.booking_code.ends_with("-000001"));
        assert!(second.booking_code.ends_with("-000002"));
        assert!(first.booking_code.starts_with("HMS-"));

        // The code is the guest-facing handle for lookups.
        let found = service.booking_by_code(&second.booking_code).await.unwrap();
        assert_eq!(found.id, second.id);
        assert!(service
            .booking_by_code("HMS-2026-999999")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_backdated_check_in_requires_reason() {
        let service = service().await;
        let booking = service.create_stay(request("r-101", BookingType::WalkIn)).await.unwrap();

        let err = service.check_in(&booking.id, true, None).await.unwrap_err();
        assert!(err.is_validation());
        // Nothing moved.
        let unchanged = service.booking(&booking.id).await.unwrap();
        assert_eq!(unchanged.status, BookingStatus::Confirmed);

        let checked_in = service
            .check_in(&booking.id, true, Some("guest arrived during night audit".into()))
            .await
            .unwrap();
        assert_eq!(checked_in.status, BookingStatus::InHouse);

        let log = &service.store.audit_logs().await.unwrap()[0];
        assert_eq!(log.action, AuditAction::BackdatedCheckIn);
        assert!(log.reason.is_some());
    }

    #[tokio::test]
    async fn test_cancel_rejects_in_house() {
        let service = service().await;
        let booking = service.create_stay(request("r-101", BookingType::WalkIn)).await.unwrap();
        service.check_in(&booking.id, false, None).await.unwrap();

        let audit_before = service.store.audit_logs().await.unwrap().len();
        let err = service.cancel(&booking.id, "guest changed plans").await.unwrap_err();
        assert!(err.is_invalid_state());

        // Idempotent refusal: fields untouched, no audit entry appended.
        let unchanged = service.booking(&booking.id).await.unwrap();
        assert_eq!(unchanged.status, BookingStatus::InHouse);
        assert_eq!(service.store.audit_logs().await.unwrap().len(), audit_before);
    }

    #[tokio::test]
    async fn test_cancel_and_no_show_from_reserved() {
        let service = service().await;
        let a = service.create_stay(request("r-101", BookingType::Reservation)).await.unwrap();
        let b = service.create_stay(request("r-103", BookingType::Reservation)).await.unwrap();

        let cancelled = service.cancel(&a.id, "plans changed").await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let no_show = service.mark_no_show(&b.id).await.unwrap();
        assert_eq!(no_show.status, BookingStatus::NoShow);
        // Room untouched by a no-show.
        let room = service.store.get_room("r-103").await.unwrap();
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn test_room_move_while_in_house() {
        let service = service().await;
        let booking = service.create_stay(request("r-101", BookingType::WalkIn)).await.unwrap();
        service.check_in(&booking.id, false, None).await.unwrap();

        let moved = service
            .update_booking(
                &booking.id,
                BookingPatch {
                    room_id: Some("r-103".into()),
                    ..Default::default()
                },
                Some("AC failure in 101".into()),
            )
            .await
            .unwrap();
        assert_eq!(moved.room_id, "r-103");

        assert_eq!(
            service.store.get_room("r-101").await.unwrap().status,
            RoomStatus::Cleaning
        );
        assert_eq!(
            service.store.get_room("r-103").await.unwrap().status,
            RoomStatus::Occupied
        );

        let log = &service.store.audit_logs().await.unwrap()[0];
        assert_eq!(log.action, AuditAction::RoomChanged);
        assert_eq!(log.previous_value.as_deref(), Some("r-101"));
        assert_eq!(log.new_value.as_deref(), Some("r-103"));
    }

    #[tokio::test]
    async fn test_update_before_check_in_is_plain_update() {
        let service = service().await;
        let booking = service.create_stay(request("r-101", BookingType::Reservation)).await.unwrap();

        // Room change on a not-yet-arrived booking moves no room statuses.
        service
            .update_booking(
                &booking.id,
                BookingPatch {
                    room_id: Some("r-103".into()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            service.store.get_room("r-101").await.unwrap().status,
            RoomStatus::Available
        );
        assert_eq!(
            service.store.get_room("r-103").await.unwrap().status,
            RoomStatus::Available
        );
        let log = &service.store.audit_logs().await.unwrap()[0];
        assert_eq!(log.action, AuditAction::BookingUpdated);
    }

    #[tokio::test]
    async fn test_booking_filters() {
        let service = service().await;
        let a = service.create_stay(request("r-101", BookingType::WalkIn)).await.unwrap();
        let b = service.create_stay(request("r-103", BookingType::Reservation)).await.unwrap();
        service.cancel(&b.id, "dup").await.unwrap();

        let confirmed = service
            .bookings(&BookingFilters {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, a.id);

        let by_code = service
            .bookings(&BookingFilters {
                search: Some(a.booking_code.to_lowercase()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_code.len(), 1);

        let by_guest = service
            .bookings(&BookingFilters {
                search: Some("priya".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_guest.len(), 2);
    }
}
