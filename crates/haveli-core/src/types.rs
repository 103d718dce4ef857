//! # Domain Types
//!
//! Core domain types used throughout Haveli PMS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Booking      │   │     Folio       │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  booking_code   │   │  booking_id 1:1 │   │  folio_id (FK)  │       │
//! │  │  status         │   │  line_items     │   │  method         │       │
//! │  │  check_in/out   │   │  grand_total    │   │  amount         │       │
//! │  └───────┬─────────┘   └─────────────────┘   └─────────────────┘       │
//! │          │                                                              │
//! │  ┌───────┴─────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Guest       │   │  Room/RoomType  │   │    AuditLog     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Bookings carry two identifiers:
//! - `id`: UUID v4 - immutable, used for relations
//! - `booking_code`: `HMS-{year}-{seq:06}` - human-shareable, printed on bills
//!
//! All enums serialize to their wire spellings (`SCREAMING_SNAKE_CASE`) so the
//! persisted documents stay readable and stable across versions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Percent};

// =============================================================================
// Room Status
// =============================================================================

/// Housekeeping status of a physical room.
///
/// Mutated only by the lifecycle service (check-in/out, room moves) or by an
/// explicit staff override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// Clean and ready to sell.
    Available,
    /// A guest is in the room right now.
    Occupied,
    /// Awaiting housekeeping after a check-out.
    Cleaning,
    /// Out of order; never bookable.
    Maintenance,
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle state of a booking.
///
/// ```text
/// RESERVED ──confirm──► CONFIRMED ──check_in──► IN_HOUSE ──check_out──► CHECKED_OUT
///    │                      │
///    └──────cancel──────────┴──► CANCELLED
///    RESERVED/CONFIRMED ──no_show──► NO_SHOW
/// ```
///
/// The original system used `CHECKED_IN` and `IN_HOUSE` interchangeably; we
/// store `IN_HOUSE` and accept `CHECKED_IN` on input for old documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Reserved,
    Confirmed,
    #[serde(alias = "CHECKED_IN")]
    InHouse,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Terminal states never return to the active lifecycle and never block
    /// a room for new bookings.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::CheckedOut | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// True while the guest physically holds the room.
    #[inline]
    pub const fn is_in_house(&self) -> bool {
        matches!(self, BookingStatus::InHouse)
    }
}

// =============================================================================
// Payment Status / Method / Booking Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    PayAtHotel,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    Online,
}

/// Wire spelling, used in audit descriptions ("Payment received: ... via CASH").
impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Online => "ONLINE",
        };
        f.write_str(name)
    }
}

/// How the booking entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    /// Booked ahead of arrival (online or by phone).
    Reservation,
    /// Guest at the desk, effective immediately.
    WalkIn,
}

// =============================================================================
// Line Item Type
// =============================================================================

/// Category of a folio charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemType {
    /// The system-created nightly room charge. Protected from ad-hoc removal.
    RoomCharge,
    ExtraBed,
    Food,
    Laundry,
    Transport,
    Misc,
}

/// Wire spelling, used in audit descriptions ("Added FOOD: Dinner").
impl std::fmt::Display for LineItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LineItemType::RoomCharge => "ROOM_CHARGE",
            LineItemType::ExtraBed => "EXTRA_BED",
            LineItemType::Food => "FOOD",
            LineItemType::Laundry => "LAUNDRY",
            LineItemType::Transport => "TRANSPORT",
            LineItemType::Misc => "MISC",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Audit Taxonomy
// =============================================================================

/// The closed set of loggable events.
///
/// Every mutating service operation maps to exactly one of these; reports and
/// other reads log nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    BookingCreated,
    BookingUpdated,
    BookingCancelled,
    CheckIn,
    CheckOut,
    BackdatedCheckIn,
    BackdatedCheckOut,
    RoomChanged,
    PaymentAdded,
    PaymentEdited,
    PaymentDeleted,
    FolioUpdated,
    NoShowMarked,
}

/// Which kind of entity an audit entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEntityType {
    Booking,
    Folio,
    Payment,
    Room,
    Guest,
}

// =============================================================================
// Reference Data: RoomType and Room
// =============================================================================

/// A sellable category of room. Static reference data, immutable at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomType {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Nightly rate before any discount or tax.
    pub base_price: Money,
    /// Maximum party size this type sleeps.
    pub capacity: u32,
    pub amenities: Vec<String>,
    /// Ordered for display; first image is the cover.
    pub images: Vec<String>,
}

/// A physical room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    /// Unique display label ("101", "202").
    pub number: String,
    pub type_id: String,
    pub status: RoomStatus,
}

// =============================================================================
// Guest
// =============================================================================

/// A guest record, created once per booking (no dedup by phone or name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: Option<String>,
    pub id_proof: Option<String>,
}

/// Guest data before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: Option<String>,
    pub id_proof: Option<String>,
}

/// Staff edit of guest contact fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub id_proof: Option<Option<String>>,
}

// =============================================================================
// Booking
// =============================================================================

/// A stay: one guest party in one room over a half-open date range
/// `[check_in, check_out)`.
///
/// `total_amount` mirrors the folio's grand total; the billing service keeps
/// it in sync after every folio mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    /// Human-shareable code, `HMS-{year}-{seq:06}`.
    pub booking_code: String,
    pub guest_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests_count: u32,
    pub total_amount: Money,
    pub daily_rate: Money,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_type: BookingType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Field patch for a booking. `None` leaves the field untouched.
///
/// Replaces the original system's structural `Partial<Booking>`; `Option`
/// carries the same "absent means unchanged" meaning.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub room_id: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests_count: Option<u32>,
    pub total_amount: Option<Money>,
    pub daily_rate: Option<Money>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<Option<String>>,
}

// =============================================================================
// Folio
// =============================================================================

/// One charge entry on a folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioLineItem {
    pub id: String,
    pub folio_id: String,
    #[serde(rename = "type")]
    pub kind: LineItemType,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// Always `quantity × unit_price`; computed at insert, never edited.
    pub total: Money,
    pub date: NaiveDate,
}

/// Line item data before the store assigns ids.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub kind: LineItemType,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub date: NaiveDate,
}

/// Field patch for a folio's caller-mutable inputs. `None` leaves the field
/// untouched.
///
/// Deliberately narrow: `subtotal`, `tax_amount` and `grand_total` are
/// derived and have no patch fields, so no caller can bypass the
/// recalculation routine.
#[derive(Debug, Clone, Default)]
pub struct FolioPatch {
    pub discount_amount: Option<Money>,
    pub discount_percent: Option<Percent>,
    pub tax_percent: Option<Percent>,
}

/// The running bill attached 1:1 to a booking.
///
/// ## Invariant
/// `subtotal`, `tax_amount` and `grand_total` are pure functions of
/// `line_items`, `discount_amount`, `discount_percent` and `tax_percent`,
/// written only by [`crate::folio::recalculate`]. Nothing else may touch
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folio {
    pub id: String,
    pub booking_id: String,
    pub line_items: Vec<FolioLineItem>,
    pub subtotal: Money,
    /// Flat discount, applied before the percentage discount.
    pub discount_amount: Money,
    pub discount_percent: Percent,
    pub tax_amount: Money,
    pub tax_percent: Percent,
    pub grand_total: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment received against a folio. Append/delete only; edits go through
/// the billing service so they leave an audit snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub folio_id: String,
    pub booking_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    /// External reference (UPI txn id, card auth code).
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// Payment data before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub folio_id: String,
    pub booking_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
}

/// Field patch for a payment. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub amount: Option<Money>,
    pub method: Option<PaymentMethod>,
    pub reference: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

// =============================================================================
// Audit Log
// =============================================================================

/// One append-only audit entry. The store keeps entries newest-first and
/// truncates to [`crate::AUDIT_LOG_RETENTION`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: String,
    pub description: String,
    pub reason: Option<String>,
    /// JSON snapshot of the entity before the change, where applicable.
    pub previous_value: Option<String>,
    /// JSON snapshot after the change, where applicable.
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// Audit entry data before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: String,
    pub description: String,
    pub reason: Option<String>,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub created_by: String,
}

// =============================================================================
// Read Projections
// =============================================================================

/// What a booking owes right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Folio grand total, falling back to `Booking.total_amount` when the
    /// folio is missing.
    pub total_billed: Money,
    pub total_paid: Money,
    /// May be negative when overpaid.
    pub balance_due: Money,
}

impl BalanceSummary {
    /// Fully paid means nothing left to collect (overpaid counts as settled).
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.balance_due <= Money::zero()
    }
}

/// One room type in an availability response, with the rooms that survived
/// the overlap scan and the stay price for the requested range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTypeAvailability {
    pub room_type: RoomType,
    /// Non-empty by construction; types with no free rooms are dropped.
    pub available_rooms: Vec<Room>,
    /// `base_price × nights`.
    pub total_price: Money,
}

/// Front-desk dashboard aggregate for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today_checkins: Vec<Booking>,
    pub today_checkouts: Vec<Booking>,
    pub in_house: Vec<Booking>,
    /// Past their check-in date but never checked in.
    pub pending_arrivals: Vec<Booking>,
    /// Past their check-out date but still in house.
    pub overdue_checkouts: Vec<Booking>,
    pub current_occupancy: usize,
    pub total_rooms: usize,
    pub today_revenue_cash: Money,
    pub today_revenue_upi: Money,
    pub today_revenue_card: Money,
    pub today_revenue_online: Money,
    /// In-house bookings with a positive balance.
    pub unpaid_count: usize,
    pub unpaid_amount: Money,
    pub recent_bookings: Vec<Booking>,
}

// =============================================================================
// Unit Tests
// =============================================================================
