//! End-to-end walk-in flow: create a stay, check in, bill, discount, pay,
//! check out - verifying balances, room statuses and the audit trail at
//! every step.

use std::sync::Arc;

use chrono::NaiveDate;

use haveli_core::{
    AuditAction, BookingStatus, BookingType, LineItemType, Money, NewGuest, PaymentMethod,
    PaymentStatus, Percent, RoomStatus,
};
use haveli_ops::{
    AddLineItemRequest, AddPaymentRequest, BookingService, CreateStayRequest, FolioService,
};
use haveli_store::Store;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

async fn setup() -> (Arc<Store>, BookingService, FolioService) {
    let store = Arc::new(Store::in_memory());
    store.initialize().await.unwrap();
    (
        store.clone(),
        BookingService::new(store.clone(), "admin"),
        FolioService::new(store, "admin"),
    )
}

fn walk_in(room_id: &str) -> CreateStayRequest {
    CreateStayRequest {
        guest: NewGuest {
            name: "Rajesh Kumar".into(),
            phone: "9876543210".into(),
            email: Some("rajesh@email.com".into()),
            city: Some("Hyderabad".into()),
            id_proof: None,
        },
        room_id: room_id.into(),
        check_in: date(1),
        check_out: date(3),
        guests_count: 2,
        daily_rate: Money::from_rupees(1200),
        booking_type: BookingType::WalkIn,
        notes: None,
    }
}

/// The full desk flow, start to finish.
#[tokio::test]
async fn walk_in_stay_from_arrival_to_checkout() {
    let (store, bookings, folios) = setup().await;

    // Walk-in, room 101 @ ₹1200/night, 2 nights.
    let booking = bookings.create_stay(walk_in("r-101")).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_amount, Money::from_rupees(2400));

    let folio = folios.folio_for_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(folio.line_items.len(), 1);
    let room_charge = &folio.line_items[0];
    assert_eq!(room_charge.kind, LineItemType::RoomCharge);
    assert_eq!(room_charge.quantity, 2);
    assert_eq!(room_charge.unit_price, Money::from_rupees(1200));
    assert_eq!(room_charge.total, Money::from_rupees(2400));
    assert_eq!(folio.grand_total, Money::from_rupees(2400));

    // Check in: booking in house, room occupied.
    let booking = bookings.check_in(&booking.id, false, None).await.unwrap();
    assert_eq!(booking.status, BookingStatus::InHouse);
    assert_eq!(
        store.get_room("r-101").await.unwrap().status,
        RoomStatus::Occupied
    );

    // Room-service dinner raises the bill to ₹2900.
    let folio = folios
        .add_line_item(AddLineItemRequest {
            folio_id: folio.id.clone(),
            kind: LineItemType::Food,
            description: "Dinner".into(),
            quantity: 1,
            unit_price: Money::from_rupees(500),
            date: date(1),
        })
        .await
        .unwrap();
    assert_eq!(folio.subtotal, Money::from_rupees(2900));
    assert_eq!(folio.grand_total, Money::from_rupees(2900));
    assert_eq!(
        bookings.booking(&booking.id).await.unwrap().total_amount,
        Money::from_rupees(2900)
    );

    // 10% discount: 290 off, ₹2610 due.
    let folio = folios
        .apply_discount(&folio.id, Money::zero(), Percent::from_bps(1000))
        .await
        .unwrap();
    assert_eq!(folio.tax_amount, Money::zero());
    assert_eq!(folio.grand_total, Money::from_rupees(2610));

    // Cash settles the folio exactly.
    folios
        .add_payment(AddPaymentRequest {
            folio_id: folio.id.clone(),
            booking_id: booking.id.clone(),
            amount: Money::from_rupees(2610),
            method: PaymentMethod::Cash,
            reference: None,
            notes: None,
        })
        .await
        .unwrap();
    let summary = folios.balance_summary(&booking.id).await.unwrap();
    assert_eq!(summary.total_billed, Money::from_rupees(2610));
    assert_eq!(summary.balance_due, Money::zero());
    assert!(summary.is_settled());
    assert_eq!(
        bookings.booking(&booking.id).await.unwrap().payment_status,
        PaymentStatus::Paid
    );

    // Check out: room to cleaning, booking terminal.
    let booking = bookings.check_out(&booking.id, false, None).await.unwrap();
    assert_eq!(booking.status, BookingStatus::CheckedOut);
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert_eq!(
        store.get_room("r-101").await.unwrap().status,
        RoomStatus::Cleaning
    );

    // The trail reads newest-first: every mutation logged exactly once.
    let actions: Vec<AuditAction> = store
        .audit_logs()
        .await
        .unwrap()
        .iter()
        .map(|l| l.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::CheckOut,
            AuditAction::PaymentAdded,
            AuditAction::FolioUpdated, // discount
            AuditAction::FolioUpdated, // dinner
            AuditAction::CheckIn,
            AuditAction::BookingCreated,
        ]
    );
}

/// Availability over the booked range excludes the room; a disjoint range
/// includes it again once the status allows.
#[tokio::test]
async fn availability_tracks_the_live_booking() {
    let (_, bookings, _) = setup().await;
    let booking = bookings.create_stay(walk_in("r-101")).await.unwrap();

    // Overlapping request: room 101 must not be offered.
    let offered = bookings
        .check_availability(date(2), date(4), 2)
        .await
        .unwrap();
    let offered_rooms: Vec<String> = offered
        .iter()
        .flat_map(|rt| rt.available_rooms.iter().map(|r| r.id.clone()))
        .collect();
    assert!(!offered_rooms.contains(&"r-101".to_string()));
    assert!(offered_rooms.contains(&"r-103".to_string()));

    // Disjoint range: room 101 is back (status still AVAILABLE pre-arrival).
    let offered = bookings
        .check_availability(date(3), date(5), 2)
        .await
        .unwrap();
    let offered_rooms: Vec<String> = offered
        .iter()
        .flat_map(|rt| rt.available_rooms.iter().map(|r| r.id.clone()))
        .collect();
    assert!(offered_rooms.contains(&"r-101".to_string()));

    // Cancelling releases the overlapping range too.
    bookings.cancel(&booking.id, "plans changed").await.unwrap();
    let offered = bookings
        .check_availability(date(2), date(4), 2)
        .await
        .unwrap();
    assert!(offered
        .iter()
        .flat_map(|rt| rt.available_rooms.iter())
        .any(|r| r.id == "r-101"));
}

/// Each payment moves the balance down by exactly its amount.
#[tokio::test]
async fn balance_decreases_payment_by_payment() {
    let (_, bookings, folios) = setup().await;
    let booking = bookings.create_stay(walk_in("r-101")).await.unwrap();
    let folio = folios.folio_for_booking(&booking.id).await.unwrap().unwrap();

    let mut expected = Money::from_rupees(2400);
    for amount in [500_i64, 700, 900, 300] {
        folios
            .add_payment(AddPaymentRequest {
                folio_id: folio.id.clone(),
                booking_id: booking.id.clone(),
                amount: Money::from_rupees(amount),
                method: PaymentMethod::Upi,
                reference: None,
                notes: None,
            })
            .await
            .unwrap();
        expected -= Money::from_rupees(amount);
        let summary = folios.balance_summary(&booking.id).await.unwrap();
        assert_eq!(summary.balance_due, expected);
    }
    assert!(folios.balance_summary(&booking.id).await.unwrap().is_settled());
}

/// Overpaying yields a negative balance and still reads as settled.
#[tokio::test]
async fn overpayment_goes_negative_but_settled() {
    let (_, bookings, folios) = setup().await;
    let booking = bookings.create_stay(walk_in("r-101")).await.unwrap();
    let folio = folios.folio_for_booking(&booking.id).await.unwrap().unwrap();

    folios
        .add_payment(AddPaymentRequest {
            folio_id: folio.id,
            booking_id: booking.id.clone(),
            amount: Money::from_rupees(3000),
            method: PaymentMethod::Cash,
            reference: None,
            notes: None,
        })
        .await
        .unwrap();

    let summary = folios.balance_summary(&booking.id).await.unwrap();
    assert_eq!(summary.balance_due, Money::from_rupees(-600));
    assert!(summary.is_settled());
    assert_eq!(
        bookings.booking(&booking.id).await.unwrap().payment_status,
        PaymentStatus::Paid
    );
}

/// Every mutating operation appends exactly one entry whose action and
/// entity match; failed operations append none.
#[tokio::test]
async fn audit_trail_is_complete_and_exact() {
    let (store, bookings, folios) = setup().await;
    let booking = bookings.create_stay(walk_in("r-101")).await.unwrap();
    let folio = folios.folio_for_booking(&booking.id).await.unwrap().unwrap();

    let count = || async { store.audit_logs().await.unwrap().len() };
    assert_eq!(count().await, 1); // BOOKING_CREATED

    bookings.check_in(&booking.id, false, None).await.unwrap();
    assert_eq!(count().await, 2);

    // A failed cancel leaves the trail untouched.
    assert!(bookings.cancel(&booking.id, "no").await.is_err());
    assert_eq!(count().await, 2);

    let folio = folios
        .add_line_item(AddLineItemRequest {
            folio_id: folio.id.clone(),
            kind: LineItemType::ExtraBed,
            description: "Extra bed".into(),
            quantity: 1,
            unit_price: Money::from_rupees(300),
            date: date(1),
        })
        .await
        .unwrap();
    assert_eq!(count().await, 3);

    let extra_bed = folio
        .line_items
        .iter()
        .find(|li| li.kind == LineItemType::ExtraBed)
        .unwrap()
        .id
        .clone();
    folios.remove_line_item(&folio.id, &extra_bed).await.unwrap();
    assert_eq!(count().await, 4);

    folios
        .apply_discount(&folio.id, Money::from_rupees(100), Percent::zero())
        .await
        .unwrap();
    assert_eq!(count().await, 5);

    let payment = folios
        .add_payment(AddPaymentRequest {
            folio_id: folio.id.clone(),
            booking_id: booking.id.clone(),
            amount: Money::from_rupees(1000),
            method: PaymentMethod::Card,
            reference: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(count().await, 6);

    folios
        .update_payment(
            &payment.id,
            Default::default(),
            "reconciled against card slip",
        )
        .await
        .unwrap();
    assert_eq!(count().await, 7);

    folios.delete_payment(&payment.id, "charged twice").await.unwrap();
    assert_eq!(count().await, 8);

    // Entity ids line up with what each entry mutated.
    let logs = store.audit_logs().await.unwrap();
    assert_eq!(logs[0].action, AuditAction::PaymentDeleted);
    assert_eq!(logs[0].entity_id, payment.id);
    assert_eq!(logs[2].action, AuditAction::PaymentAdded);
    assert_eq!(logs[3].action, AuditAction::FolioUpdated);
    assert_eq!(logs[3].entity_id, folio.id);
    assert_eq!(logs[7].action, AuditAction::BookingCreated);
    assert_eq!(logs[7].entity_id, booking.id);
}

/// A reservation that never shows up: no room side effect, terminal state
/// frees the dates.
#[tokio::test]
async fn no_show_frees_the_room_dates() {
    let (store, bookings, _) = setup().await;
    let mut request = walk_in("r-101");
    request.booking_type = BookingType::Reservation;
    let booking = bookings.create_stay(request).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Reserved);

    bookings.mark_no_show(&booking.id).await.unwrap();
    assert_eq!(
        store.get_room("r-101").await.unwrap().status,
        RoomStatus::Available
    );

    // The range is bookable again.
    let offered = bookings
        .check_availability(date(1), date(3), 2)
        .await
        .unwrap();
    assert!(offered
        .iter()
        .flat_map(|rt| rt.available_rooms.iter())
        .any(|r| r.id == "r-101"));
}

/// The staff walk-in list keeps CLEANING rooms sellable, unlike the public
/// availability.
#[tokio::test]
async fn walk_in_list_is_looser_than_public_availability() {
    let (store, bookings, _) = setup().await;
    store
        .update_room_status("r-104", RoomStatus::Cleaning)
        .await
        .unwrap();
    store
        .update_room_status("r-302", RoomStatus::Maintenance)
        .await
        .unwrap();

    let public = bookings
        .check_availability(date(1), date(3), 2)
        .await
        .unwrap();
    let public_rooms: Vec<String> = public
        .iter()
        .flat_map(|rt| rt.available_rooms.iter().map(|r| r.id.clone()))
        .collect();
    assert!(!public_rooms.contains(&"r-104".to_string()));

    let staff = bookings
        .available_rooms_for_walk_in(date(1), date(3))
        .await
        .unwrap();
    let staff_rooms: Vec<String> = staff.iter().map(|r| r.id.clone()).collect();
    assert!(staff_rooms.contains(&"r-104".to_string()));
    assert!(!staff_rooms.contains(&"r-302".to_string()));
}
