//! # The Persistent Store
//!
//! Single source of truth for all collections. Reads return materialized
//! copies; writes persist the full collection back to the medium.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Store                                        │
//! │                                                                         │
//! │  rooms      get_rooms / get_room / update_room_status                  │
//! │  room types get_room_types / get_room_type          (reference data)   │
//! │  guests     get_guests / get_guest / add_guest / update_guest          │
//! │  bookings   get_bookings / get_booking / get_booking_by_code           │
//! │             add_booking / update_booking / next_booking_sequence       │
//! │  folios     get_folio / folio_for_booking / add_folio / update_folio   │
//! │             add_line_item / remove_line_item / apply_discount          │
//! │             └── every folio mutation recalculates totals               │
//! │  payments   get_payment / payments_for_booking / add_payment           │
//! │             update_payment / delete_payment                            │
//! │  audit      audit_logs / audit_logs_for_entity / append_audit          │
//! │             └── prepend newest-first, truncate to retention cap        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is deliberately mechanical: it checks that referenced ids exist
//! but enforces no booking invariants. Date ranges, state transitions and
//! capacity rules are the services' responsibility, validated before
//! anything is written here.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use haveli_core::folio::{line_total, recalculate};
use haveli_core::{
    AuditLog, Booking, BookingPatch, Folio, FolioLineItem, FolioPatch, Guest, GuestPatch, Money,
    NewAuditEntry, NewGuest, NewLineItem, NewPayment, Payment, PaymentPatch, Percent, Room,
    RoomStatus, RoomType, AUDIT_LOG_RETENTION,
};

use crate::error::{StoreError, StoreResult};
use crate::medium::{keys, MemoryMedium, StorageMedium};
use crate::seed;

/// The key-value-backed repository over all domain collections.
pub struct Store {
    medium: Arc<dyn StorageMedium>,
}

impl Store {
    /// Creates a store over an arbitrary medium.
    pub fn new(medium: Arc<dyn StorageMedium>) -> Self {
        Store { medium }
    }

    /// Creates a store over a fresh in-memory medium (tests, demos).
    pub fn in_memory() -> Self {
        Store::new(Arc::new(MemoryMedium::new()))
    }

    // =========================================================================
    // Document Helpers
    // =========================================================================

    async fn read_collection<T: DeserializeOwned>(&self, key: &'static str) -> StoreResult<Vec<T>> {
        match self.medium.load(key).await? {
            Some(document) => {
                serde_json::from_str(&document).map_err(|err| StoreError::corrupt(key, err))
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write_collection<T: Serialize>(
        &self,
        key: &'static str,
        items: &[T],
    ) -> StoreResult<()> {
        let document =
            serde_json::to_string_pretty(items).map_err(|err| StoreError::corrupt(key, err))?;
        self.medium.save(key, &document).await
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Installs the seed inventory on an empty medium. Idempotent: returns
    /// `true` only on the run that actually seeded.
    pub async fn initialize(&self) -> StoreResult<bool> {
        if self.medium.load(keys::INITIALIZED).await?.is_some() {
            return Ok(false);
        }

        debug!("initializing empty store with seed inventory");
        self.write_collection(keys::ROOM_TYPES, &seed::room_types()).await?;
        self.write_collection(keys::ROOMS, &seed::rooms()).await?;
        self.write_collection::<Guest>(keys::GUESTS, &[]).await?;
        self.write_collection::<Booking>(keys::BOOKINGS, &[]).await?;
        self.write_collection::<Folio>(keys::FOLIOS, &[]).await?;
        self.write_collection::<Payment>(keys::PAYMENTS, &[]).await?;
        self.write_collection::<AuditLog>(keys::AUDIT_LOGS, &[]).await?;
        self.medium.save(keys::BOOKING_SEQUENCE, "0").await?;
        self.medium.save(keys::INITIALIZED, "true").await?;
        Ok(true)
    }

    // =========================================================================
    // Room Types (static reference data)
    // =========================================================================

    pub async fn get_room_types(&self) -> StoreResult<Vec<RoomType>> {
        self.read_collection(keys::ROOM_TYPES).await
    }

    pub async fn get_room_type(&self, id: &str) -> StoreResult<RoomType> {
        self.get_room_types()
            .await?
            .into_iter()
            .find(|rt| rt.id == id)
            .ok_or_else(|| StoreError::not_found("Room type", id))
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    pub async fn get_rooms(&self) -> StoreResult<Vec<Room>> {
        self.read_collection(keys::ROOMS).await
    }

    pub async fn get_room(&self, id: &str) -> StoreResult<Room> {
        self.get_rooms()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("Room", id))
    }

    /// Moves a room to a new housekeeping status.
    pub async fn update_room_status(&self, id: &str, status: RoomStatus) -> StoreResult<Room> {
        let mut rooms = self.get_rooms().await?;
        let room = rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("Room", id))?;

        debug!(room = %room.number, ?status, "room status change");
        room.status = status;
        let updated = room.clone();
        self.write_collection(keys::ROOMS, &rooms).await?;
        Ok(updated)
    }

    // =========================================================================
    // Guests
    // =========================================================================

    pub async fn get_guests(&self) -> StoreResult<Vec<Guest>> {
        self.read_collection(keys::GUESTS).await
    }

    pub async fn get_guest(&self, id: &str) -> StoreResult<Guest> {
        self.get_guests()
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| StoreError::not_found("Guest", id))
    }

    /// Adds a guest with a fresh id. No uniqueness constraint on phone or
    /// name; one record per booking is the model.
    pub async fn add_guest(&self, new: NewGuest) -> StoreResult<Guest> {
        let mut guests = self.get_guests().await?;
        let guest = Guest {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            city: new.city,
            id_proof: new.id_proof,
        };
        guests.push(guest.clone());
        self.write_collection(keys::GUESTS, &guests).await?;
        Ok(guest)
    }

    pub async fn update_guest(&self, id: &str, patch: GuestPatch) -> StoreResult<Guest> {
        let mut guests = self.get_guests().await?;
        let guest = guests
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| StoreError::not_found("Guest", id))?;

        if let Some(name) = patch.name {
            guest.name = name;
        }
        if let Some(phone) = patch.phone {
            guest.phone = phone;
        }
        if let Some(email) = patch.email {
            guest.email = email;
        }
        if let Some(city) = patch.city {
            guest.city = city;
        }
        if let Some(id_proof) = patch.id_proof {
            guest.id_proof = id_proof;
        }

        let updated = guest.clone();
        self.write_collection(keys::GUESTS, &guests).await?;
        Ok(updated)
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    pub async fn get_bookings(&self) -> StoreResult<Vec<Booking>> {
        self.read_collection(keys::BOOKINGS).await
    }

    pub async fn get_booking(&self, id: &str) -> StoreResult<Booking> {
        self.get_bookings()
            .await?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("Booking", id))
    }

    pub async fn get_booking_by_code(&self, code: &str) -> StoreResult<Booking> {
        self.get_bookings()
            .await?
            .into_iter()
            .find(|b| b.booking_code == code)
            .ok_or_else(|| StoreError::not_found("Booking", code))
    }

    pub async fn add_booking(&self, booking: Booking) -> StoreResult<Booking> {
        debug!(booking = %booking.booking_code, "adding booking");
        let mut bookings = self.get_bookings().await?;
        bookings.push(booking.clone());
        self.write_collection(keys::BOOKINGS, &bookings).await?;
        Ok(booking)
    }

    pub async fn update_booking(&self, id: &str, patch: BookingPatch) -> StoreResult<Booking> {
        let mut bookings = self.get_bookings().await?;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("Booking", id))?;

        if let Some(room_id) = patch.room_id {
            booking.room_id = room_id;
        }
        if let Some(check_in) = patch.check_in {
            booking.check_in = check_in;
        }
        if let Some(check_out) = patch.check_out {
            booking.check_out = check_out;
        }
        if let Some(guests_count) = patch.guests_count {
            booking.guests_count = guests_count;
        }
        if let Some(total_amount) = patch.total_amount {
            booking.total_amount = total_amount;
        }
        if let Some(daily_rate) = patch.daily_rate {
            booking.daily_rate = daily_rate;
        }
        if let Some(status) = patch.status {
            booking.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            booking.payment_status = payment_status;
        }
        if let Some(notes) = patch.notes {
            booking.notes = notes;
        }

        let updated = booking.clone();
        self.write_collection(keys::BOOKINGS, &bookings).await?;
        Ok(updated)
    }

    /// Bumps and persists the booking sequence.
    ///
    /// Monotonic for a single terminal; the single-client deployment model
    /// means no cross-writer uniqueness is attempted.
    pub async fn next_booking_sequence(&self) -> StoreResult<u64> {
        let current: u64 = match self.medium.load(keys::BOOKING_SEQUENCE).await? {
            Some(document) => serde_json::from_str(&document)
                .map_err(|err| StoreError::corrupt(keys::BOOKING_SEQUENCE, err))?,
            None => 0,
        };
        let next = current + 1;
        self.medium
            .save(keys::BOOKING_SEQUENCE, &next.to_string())
            .await?;
        Ok(next)
    }

    // =========================================================================
    // Folios
    // =========================================================================

    pub async fn get_folios(&self) -> StoreResult<Vec<Folio>> {
        self.read_collection(keys::FOLIOS).await
    }

    pub async fn get_folio(&self, id: &str) -> StoreResult<Folio> {
        self.get_folios()
            .await?
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::not_found("Folio", id))
    }

    /// The folio attached to a booking, if one exists (1:1 by construction).
    pub async fn folio_for_booking(&self, booking_id: &str) -> StoreResult<Option<Folio>> {
        Ok(self
            .get_folios()
            .await?
            .into_iter()
            .find(|f| f.booking_id == booking_id))
    }

    pub async fn add_folio(&self, folio: Folio) -> StoreResult<Folio> {
        let mut folios = self.get_folios().await?;
        folios.push(folio.clone());
        self.write_collection(keys::FOLIOS, &folios).await?;
        Ok(folio)
    }

    /// Patches a folio's caller-mutable inputs (discount fields, tax rate)
    /// and recalculates. The derived totals have no patch path.
    pub async fn update_folio(&self, folio_id: &str, patch: FolioPatch) -> StoreResult<Folio> {
        let mut folios = self.get_folios().await?;
        let folio = folios
            .iter_mut()
            .find(|f| f.id == folio_id)
            .ok_or_else(|| StoreError::not_found("Folio", folio_id))?;

        if let Some(discount_amount) = patch.discount_amount {
            folio.discount_amount = discount_amount;
        }
        if let Some(discount_percent) = patch.discount_percent {
            folio.discount_percent = discount_percent;
        }
        if let Some(tax_percent) = patch.tax_percent {
            folio.tax_percent = tax_percent;
        }
        recalculate(folio, Utc::now());
        let updated = folio.clone();
        self.write_collection(keys::FOLIOS, &folios).await?;
        Ok(updated)
    }

    /// Appends a line item and recalculates the folio's totals.
    pub async fn add_line_item(&self, folio_id: &str, item: NewLineItem) -> StoreResult<Folio> {
        let mut folios = self.get_folios().await?;
        let folio = folios
            .iter_mut()
            .find(|f| f.id == folio_id)
            .ok_or_else(|| StoreError::not_found("Folio", folio_id))?;

        let line_item = FolioLineItem {
            id: Uuid::new_v4().to_string(),
            folio_id: folio_id.to_string(),
            kind: item.kind,
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total: line_total(item.quantity, item.unit_price),
            date: item.date,
        };
        debug!(folio = %folio_id, kind = ?line_item.kind, total = %line_item.total, "adding line item");

        folio.line_items.push(line_item);
        recalculate(folio, Utc::now());
        let updated = folio.clone();
        self.write_collection(keys::FOLIOS, &folios).await?;
        Ok(updated)
    }

    /// Removes a line item by id and recalculates. Removing an id that is
    /// not on the folio is a no-op, matching collection-filter semantics.
    pub async fn remove_line_item(&self, folio_id: &str, line_item_id: &str) -> StoreResult<Folio> {
        let mut folios = self.get_folios().await?;
        let folio = folios
            .iter_mut()
            .find(|f| f.id == folio_id)
            .ok_or_else(|| StoreError::not_found("Folio", folio_id))?;

        folio.line_items.retain(|li| li.id != line_item_id);
        recalculate(folio, Utc::now());
        let updated = folio.clone();
        self.write_collection(keys::FOLIOS, &folios).await?;
        Ok(updated)
    }

    /// Sets both discount fields (replacing, not accumulating) and
    /// recalculates.
    pub async fn apply_discount(
        &self,
        folio_id: &str,
        amount: Money,
        percent: Percent,
    ) -> StoreResult<Folio> {
        let mut folios = self.get_folios().await?;
        let folio = folios
            .iter_mut()
            .find(|f| f.id == folio_id)
            .ok_or_else(|| StoreError::not_found("Folio", folio_id))?;

        folio.discount_amount = amount;
        folio.discount_percent = percent;
        recalculate(folio, Utc::now());
        let updated = folio.clone();
        self.write_collection(keys::FOLIOS, &folios).await?;
        Ok(updated)
    }

    // =========================================================================
    // Payments
    // =========================================================================

    pub async fn get_payments(&self) -> StoreResult<Vec<Payment>> {
        self.read_collection(keys::PAYMENTS).await
    }

    pub async fn get_payment(&self, id: &str) -> StoreResult<Payment> {
        self.get_payments()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Payment", id))
    }

    pub async fn payments_for_booking(&self, booking_id: &str) -> StoreResult<Vec<Payment>> {
        Ok(self
            .get_payments()
            .await?
            .into_iter()
            .filter(|p| p.booking_id == booking_id)
            .collect())
    }

    pub async fn payments_for_folio(&self, folio_id: &str) -> StoreResult<Vec<Payment>> {
        Ok(self
            .get_payments()
            .await?
            .into_iter()
            .filter(|p| p.folio_id == folio_id)
            .collect())
    }

    pub async fn add_payment(&self, new: NewPayment) -> StoreResult<Payment> {
        let mut payments = self.get_payments().await?;
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            folio_id: new.folio_id,
            booking_id: new.booking_id,
            amount: new.amount,
            method: new.method,
            reference: new.reference,
            notes: new.notes,
            created_at: Utc::now(),
            created_by: new.created_by,
        };
        debug!(booking = %payment.booking_id, amount = %payment.amount, method = ?payment.method, "recording payment");
        payments.push(payment.clone());
        self.write_collection(keys::PAYMENTS, &payments).await?;
        Ok(payment)
    }

    pub async fn update_payment(&self, id: &str, patch: PaymentPatch) -> StoreResult<Payment> {
        let mut payments = self.get_payments().await?;
        let payment = payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Payment", id))?;

        if let Some(amount) = patch.amount {
            payment.amount = amount;
        }
        if let Some(method) = patch.method {
            payment.method = method;
        }
        if let Some(reference) = patch.reference {
            payment.reference = reference;
        }
        if let Some(notes) = patch.notes {
            payment.notes = notes;
        }

        let updated = payment.clone();
        self.write_collection(keys::PAYMENTS, &payments).await?;
        Ok(updated)
    }

    pub async fn delete_payment(&self, id: &str) -> StoreResult<()> {
        let mut payments = self.get_payments().await?;
        let before = payments.len();
        payments.retain(|p| p.id != id);
        if payments.len() == before {
            return Err(StoreError::not_found("Payment", id));
        }
        self.write_collection(keys::PAYMENTS, &payments).await
    }

    // =========================================================================
    // Audit Log
    // =========================================================================

    /// All entries, newest-first.
    pub async fn audit_logs(&self) -> StoreResult<Vec<AuditLog>> {
        self.read_collection(keys::AUDIT_LOGS).await
    }

    pub async fn audit_logs_for_entity(&self, entity_id: &str) -> StoreResult<Vec<AuditLog>> {
        Ok(self
            .audit_logs()
            .await?
            .into_iter()
            .filter(|log| log.entity_id == entity_id)
            .collect())
    }

    /// Assigns id and timestamp, prepends (newest-first), truncates to the
    /// retention cap.
    pub async fn append_audit(&self, entry: NewAuditEntry) -> StoreResult<AuditLog> {
        let mut logs = self.audit_logs().await?;
        let log = AuditLog {
            id: Uuid::new_v4().to_string(),
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            description: entry.description,
            reason: entry.reason,
            previous_value: entry.previous_value,
            new_value: entry.new_value,
            created_at: Utc::now(),
            created_by: entry.created_by,
        };
        logs.insert(0, log.clone());
        logs.truncate(AUDIT_LOG_RETENTION);
        self.write_collection(keys::AUDIT_LOGS, &logs).await?;
        Ok(log)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
