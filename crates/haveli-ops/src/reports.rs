//! # Front-Desk Reports
//!
//! Read models over the store: the operational dashboard and the daily
//! reports the desk prints. Pure derivations; nothing here writes or logs.
//!
//! Every function takes its reference date explicitly instead of reading the
//! clock, so "today" is the caller's notion of today and the reports stay
//! deterministic under test.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use haveli_core::{
    Booking, BookingStatus, DashboardStats, Folio, Money, Payment, PaymentMethod, RoomStatus,
};
use haveli_store::Store;

use crate::error::OpsResult;

// =============================================================================
// Report Shapes
// =============================================================================

/// Payments over a date range, split by method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueReport {
    pub total_cash: Money,
    pub total_upi: Money,
    pub total_card: Money,
    pub total_online: Money,
    pub grand_total: Money,
    pub payments: Vec<Payment>,
}

/// An in-house booking still owing money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingEntry {
    pub booking: Booking,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingReport {
    pub bookings: Vec<OutstandingEntry>,
    pub total_outstanding: Money,
}

/// Room-status snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    pub cleaning_rooms: usize,
    pub maintenance_rooms: usize,
    /// Occupied share of all rooms, rounded to whole percent.
    pub occupancy_rate: u32,
}

// =============================================================================
// Reports Service
// =============================================================================

pub struct Reports {
    store: Arc<Store>,
}

impl Reports {
    pub fn new(store: Arc<Store>) -> Self {
        Reports { store }
    }

    /// The operational dashboard for `today`.
    pub async fn dashboard(&self, today: NaiveDate) -> OpsResult<DashboardStats> {
        let bookings = self.store.get_bookings().await?;
        let rooms = self.store.get_rooms().await?;
        let payments = self.store.get_payments().await?;
        let folios = self.store.get_folios().await?;

        let today_checkins: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.check_in == today && counts_for_schedule(b))
            .cloned()
            .collect();
        let today_checkouts: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.check_out == today && counts_for_schedule(b))
            .cloned()
            .collect();
        let in_house: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.status.is_in_house())
            .cloned()
            .collect();
        let pending_arrivals: Vec<Booking> = bookings
            .iter()
            .filter(|b| {
                b.check_in < today
                    && matches!(b.status, BookingStatus::Reserved | BookingStatus::Confirmed)
            })
            .cloned()
            .collect();
        let overdue_checkouts: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.check_out < today && b.status.is_in_house())
            .cloned()
            .collect();

        let mut unpaid_count = 0;
        let mut unpaid_amount = Money::zero();
        for booking in &in_house {
            let balance = balance_of(booking, &folios, &payments);
            if balance.is_positive() {
                unpaid_count += 1;
                unpaid_amount += balance;
            }
        }

        let today_payments: Vec<&Payment> = payments
            .iter()
            .filter(|p| p.created_at.date_naive() == today)
            .collect();
        let revenue = |method: PaymentMethod| -> Money {
            today_payments
                .iter()
                .filter(|p| p.method == method)
                .map(|p| p.amount)
                .sum()
        };

        let mut recent = bookings.clone();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(10);

        Ok(DashboardStats {
            today_checkins,
            today_checkouts,
            in_house,
            pending_arrivals,
            overdue_checkouts,
            current_occupancy: rooms
                .iter()
                .filter(|r| r.status == RoomStatus::Occupied)
                .count(),
            total_rooms: rooms.len(),
            today_revenue_cash: revenue(PaymentMethod::Cash),
            today_revenue_upi: revenue(PaymentMethod::Upi),
            today_revenue_card: revenue(PaymentMethod::Card),
            today_revenue_online: revenue(PaymentMethod::Online),
            unpaid_count,
            unpaid_amount,
            recent_bookings: recent,
        })
    }

    /// Bookings scheduled to arrive on `date`.
    pub async fn arrivals(&self, date: NaiveDate) -> OpsResult<Vec<Booking>> {
        Ok(self
            .store
            .get_bookings()
            .await?
            .into_iter()
            .filter(|b| b.check_in == date && counts_for_schedule(b))
            .collect())
    }

    /// Bookings scheduled to depart on `date`.
    pub async fn departures(&self, date: NaiveDate) -> OpsResult<Vec<Booking>> {
        Ok(self
            .store
            .get_bookings()
            .await?
            .into_iter()
            .filter(|b| b.check_out == date && counts_for_schedule(b))
            .collect())
    }

    /// Payments received between `from` and `to`, inclusive.
    pub async fn revenue(&self, from: NaiveDate, to: NaiveDate) -> OpsResult<RevenueReport> {
        let payments: Vec<Payment> = self
            .store
            .get_payments()
            .await?
            .into_iter()
            .filter(|p| {
                let day = p.created_at.date_naive();
                day >= from && day <= to
            })
            .collect();

        let by_method = |method: PaymentMethod| -> Money {
            payments
                .iter()
                .filter(|p| p.method == method)
                .map(|p| p.amount)
                .sum()
        };

        Ok(RevenueReport {
            total_cash: by_method(PaymentMethod::Cash),
            total_upi: by_method(PaymentMethod::Upi),
            total_card: by_method(PaymentMethod::Card),
            total_online: by_method(PaymentMethod::Online),
            grand_total: payments.iter().map(|p| p.amount).sum(),
            payments,
        })
    }

    /// In-house bookings still owing money.
    pub async fn outstanding(&self) -> OpsResult<OutstandingReport> {
        let bookings = self.store.get_bookings().await?;
        let folios = self.store.get_folios().await?;
        let payments = self.store.get_payments().await?;

        let entries: Vec<OutstandingEntry> = bookings
            .into_iter()
            .filter(|b| b.status.is_in_house())
            .filter_map(|booking| {
                let balance = balance_of(&booking, &folios, &payments);
                balance
                    .is_positive()
                    .then_some(OutstandingEntry { booking, balance })
            })
            .collect();

        Ok(OutstandingReport {
            total_outstanding: entries.iter().map(|e| e.balance).sum(),
            bookings: entries,
        })
    }

    /// Room-status snapshot.
    pub async fn occupancy(&self) -> OpsResult<OccupancyReport> {
        let rooms = self.store.get_rooms().await?;
        let count = |status: RoomStatus| rooms.iter().filter(|r| r.status == status).count();

        let occupied = count(RoomStatus::Occupied);
        let rate = if rooms.is_empty() {
            0
        } else {
            ((occupied as f64 / rooms.len() as f64) * 100.0).round() as u32
        };

        Ok(OccupancyReport {
            total_rooms: rooms.len(),
            occupied_rooms: occupied,
            available_rooms: count(RoomStatus::Available),
            cleaning_rooms: count(RoomStatus::Cleaning),
            maintenance_rooms: count(RoomStatus::Maintenance),
            occupancy_rate: rate,
        })
    }
}

/// Cancelled and no-show bookings drop off the arrival/departure boards.
fn counts_for_schedule(booking: &Booking) -> bool {
    !matches!(
        booking.status,
        BookingStatus::Cancelled | BookingStatus::NoShow
    )
}

/// Billed (folio grand total, else booking amount) minus payments received.
fn balance_of(booking: &Booking, folios: &[Folio], payments: &[Payment]) -> Money {
    let billed = folios
        .iter()
        .find(|f| f.booking_id == booking.id)
        .map(|f| f.grand_total)
        .unwrap_or(booking.total_amount);
    let paid: Money = payments
        .iter()
        .filter(|p| p.booking_id == booking.id)
        .map(|p| p.amount)
        .sum();
    billed - paid
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{AddPaymentRequest, FolioService};
    use crate::lifecycle::{BookingService, CreateStayRequest};
    use chrono::Utc;
    use haveli_core::{BookingType, NewGuest};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    async fn setup() -> (Arc<Store>, BookingService, FolioService, Reports) {
        let store = Arc::new(Store::in_memory());
        store.initialize().await.unwrap();
        (
            store.clone(),
            BookingService::new(store.clone(), "admin"),
            FolioService::new(store.clone(), "admin"),
            Reports::new(store),
        )
    }

    fn stay_request(room_id: &str, check_in: NaiveDate, check_out: NaiveDate) -> CreateStayRequest {
        CreateStayRequest {
            guest: NewGuest {
                name: "Sunita Reddy".into(),
                phone: "9876012345".into(),
                email: None,
                city: Some("Tirupati".into()),
                id_proof: None,
            },
            room_id: room_id.into(),
            check_in,
            check_out,
            guests_count: 2,
            daily_rate: Money::from_rupees(1200),
            booking_type: BookingType::WalkIn,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_dashboard_boards_and_unpaid() {
        let (_, bookings, _folios, reports) = setup().await;
        let today = date(10);

        // Arriving today, in house and unpaid.
        let arriving = bookings
            .create_stay(stay_request("r-101", today, date(12)))
            .await
            .unwrap();
        bookings.check_in(&arriving.id, false, None).await.unwrap();

        // Should have arrived two days ago, still reserved.
        bookings
            .create_stay(stay_request("r-103", date(8), date(11)))
            .await
            .unwrap();

        // Cancelled on today's board: must not show.
        let cancelled = bookings
            .create_stay(stay_request("r-104", today, date(12)))
            .await
            .unwrap();
        bookings.cancel(&cancelled.id, "dup").await.unwrap();

        let stats = reports.dashboard(today).await.unwrap();
        assert_eq!(stats.today_checkins.len(), 1);
        assert_eq!(stats.today_checkins[0].id, arriving.id);
        assert_eq!(stats.in_house.len(), 1);
        assert_eq!(stats.pending_arrivals.len(), 1);
        assert_eq!(stats.overdue_checkouts.len(), 0);
        assert_eq!(stats.current_occupancy, 1);
        assert_eq!(stats.total_rooms, 11);
        assert_eq!(stats.unpaid_count, 1);
        assert_eq!(stats.unpaid_amount, Money::from_rupees(2400));
        assert_eq!(stats.recent_bookings.len(), 3);
    }

    #[tokio::test]
    async fn test_overdue_checkout_appears_after_checkout_date() {
        let (_, bookings, _, reports) = setup().await;
        let booking = bookings
            .create_stay(stay_request("r-101", date(1), date(3)))
            .await
            .unwrap();
        bookings.check_in(&booking.id, false, None).await.unwrap();

        let stats = reports.dashboard(date(5)).await.unwrap();
        assert_eq!(stats.overdue_checkouts.len(), 1);
        assert_eq!(stats.overdue_checkouts[0].id, booking.id);
    }

    #[tokio::test]
    async fn test_arrivals_and_departures() {
        let (_, bookings, _, reports) = setup().await;
        bookings
            .create_stay(stay_request("r-101", date(1), date(3)))
            .await
            .unwrap();
        bookings
            .create_stay(stay_request("r-103", date(2), date(3)))
            .await
            .unwrap();

        assert_eq!(reports.arrivals(date(1)).await.unwrap().len(), 1);
        assert_eq!(reports.arrivals(date(2)).await.unwrap().len(), 1);
        assert_eq!(reports.arrivals(date(3)).await.unwrap().len(), 0);
        assert_eq!(reports.departures(date(3)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_revenue_splits_by_method() {
        let (store, bookings, folios, reports) = setup().await;
        let booking = bookings
            .create_stay(stay_request("r-101", date(1), date(3)))
            .await
            .unwrap();
        let folio = store.folio_for_booking(&booking.id).await.unwrap().unwrap();

        for (amount, method) in [
            (1000, PaymentMethod::Cash),
            (800, PaymentMethod::Upi),
            (600, PaymentMethod::Card),
        ] {
            folios
                .add_payment(AddPaymentRequest {
                    folio_id: folio.id.clone(),
                    booking_id: booking.id.clone(),
                    amount: Money::from_rupees(amount),
                    method,
                    reference: None,
                    notes: None,
                })
                .await
                .unwrap();
        }

        let today = Utc::now().date_naive();
        let report = reports.revenue(today, today).await.unwrap();
        assert_eq!(report.total_cash, Money::from_rupees(1000));
        assert_eq!(report.total_upi, Money::from_rupees(800));
        assert_eq!(report.total_card, Money::from_rupees(600));
        assert_eq!(report.total_online, Money::zero());
        assert_eq!(report.grand_total, Money::from_rupees(2400));
        assert_eq!(report.payments.len(), 3);

        // A window before any payment is empty.
        let empty = reports.revenue(date(1), date(2)).await.unwrap();
        assert_eq!(empty.grand_total, Money::zero());
    }

    #[tokio::test]
    async fn test_outstanding_lists_only_unpaid_in_house() {
        let (store, bookings, folios, reports) = setup().await;

        let unpaid = bookings
            .create_stay(stay_request("r-101", date(1), date(3)))
            .await
            .unwrap();
        bookings.check_in(&unpaid.id, false, None).await.unwrap();

        let paid = bookings
            .create_stay(stay_request("r-103", date(1), date(3)))
            .await
            .unwrap();
        bookings.check_in(&paid.id, false, None).await.unwrap();
        let paid_folio = store.folio_for_booking(&paid.id).await.unwrap().unwrap();
        folios
            .add_payment(AddPaymentRequest {
                folio_id: paid_folio.id,
                booking_id: paid.id.clone(),
                amount: Money::from_rupees(2400),
                method: PaymentMethod::Cash,
                reference: None,
                notes: None,
            })
            .await
            .unwrap();

        let report = reports.outstanding().await.unwrap();
        assert_eq!(report.bookings.len(), 1);
        assert_eq!(report.bookings[0].booking.id, unpaid.id);
        assert_eq!(report.total_outstanding, Money::from_rupees(2400));
    }

    #[tokio::test]
    async fn test_occupancy_snapshot() {
        let (store, bookings, _, reports) = setup().await;
        let booking = bookings
            .create_stay(stay_request("r-101", date(1), date(3)))
            .await
            .unwrap();
        bookings.check_in(&booking.id, false, None).await.unwrap();
        store
            .update_room_status("r-302", RoomStatus::Maintenance)
            .await
            .unwrap();

        let report = reports.occupancy().await.unwrap();
        assert_eq!(report.total_rooms, 11);
        assert_eq!(report.occupied_rooms, 1);
        assert_eq!(report.maintenance_rooms, 1);
        assert_eq!(report.available_rooms, 9);
        assert_eq!(report.cleaning_rooms, 0);
        assert_eq!(report.occupancy_rate, 9); // 1/11 ≈ 9%
    }
}
