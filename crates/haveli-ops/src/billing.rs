//! # Folio & Billing Service
//!
//! Line items, discounts, balances and payments for a booking's folio.
//!
//! ## Money Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_line_item / remove_line_item / apply_discount                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store recalculates folio totals (single shared routine)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  grand_total propagated into Booking.total_amount                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  balance_due = grand_total − Σ payments                                │
//! │       └── ≤ 0 on add_payment ──► Booking.payment_status = PAID          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payment edits and deletions require a reason and leave JSON snapshots in
//! the audit trail.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use haveli_core::validation::{
    validate_amount, validate_payment_amount, validate_percent, validate_quantity,
};
use haveli_core::{
    AuditAction, AuditEntityType, BalanceSummary, BookingPatch, Folio, LineItemType, Money,
    NewAuditEntry, NewLineItem, NewPayment, Payment, PaymentMethod, PaymentPatch, PaymentStatus,
    Percent,
};
use haveli_store::Store;

use crate::error::{OpsError, OpsResult};

/// Where `Booking.payment_status` lands after a payment is deleted.
///
/// The reference system hard-resets to PAY_AT_HOTEL no matter what payments
/// remain, rather than recomputing paid/partial/unpaid. Preserved as
/// documented behavior; recomputation would replace this constant's use
/// site in [`FolioService::delete_payment`].
pub const PAYMENT_STATUS_AFTER_DELETE: PaymentStatus = PaymentStatus::PayAtHotel;

// =============================================================================
// Requests
// =============================================================================

/// An ad-hoc charge for a folio.
#[derive(Debug, Clone)]
pub struct AddLineItemRequest {
    pub folio_id: String,
    pub kind: LineItemType,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// Service date shown on the bill.
    pub date: NaiveDate,
}

/// A payment received at the desk.
#[derive(Debug, Clone)]
pub struct AddPaymentRequest {
    pub folio_id: String,
    pub booking_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Folio Service
// =============================================================================

/// The folio/billing service. Like the lifecycle service, `operator` is the
/// opaque identity stamped into audit entries and payments.
pub struct FolioService {
    store: Arc<Store>,
    operator: String,
}

impl FolioService {
    pub fn new(store: Arc<Store>, operator: impl Into<String>) -> Self {
        FolioService {
            store,
            operator: operator.into(),
        }
    }

    fn audit(
        &self,
        action: AuditAction,
        entity_type: AuditEntityType,
        entity_id: &str,
        description: String,
    ) -> NewAuditEntry {
        NewAuditEntry {
            action,
            entity_type,
            entity_id: entity_id.to_string(),
            description,
            reason: None,
            previous_value: None,
            new_value: None,
            created_by: self.operator.clone(),
        }
    }

    /// Mirrors the folio's grand total onto the booking so booking lists
    /// show live amounts without joining folios.
    async fn propagate_total(&self, folio: &Folio) -> OpsResult<()> {
        self.store
            .update_booking(
                &folio.booking_id,
                BookingPatch {
                    total_amount: Some(folio.grand_total),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Folio Reads
    // =========================================================================

    pub async fn folio_for_booking(&self, booking_id: &str) -> OpsResult<Option<Folio>> {
        Ok(self.store.folio_for_booking(booking_id).await?)
    }

    /// What the booking owes right now: folio grand total (falling back to
    /// the booking's amount when no folio exists) minus payments received.
    /// Negative balance means overpaid; callers treat `≤ 0` as fully paid.
    pub async fn balance_summary(&self, booking_id: &str) -> OpsResult<BalanceSummary> {
        let booking = self.store.get_booking(booking_id).await?;
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
        Ok(BalanceSummary {
            total_billed,
            total_paid,
            balance_due: total_billed - total_paid,
        })
    }

    // =========================================================================
    // Line Items & Discount
    // =========================================================================

    /// Appends a charge, recalculates the folio and propagates the new
    /// grand total to the booking.
    pub async fn add_line_item(&self, request: AddLineItemRequest) -> OpsResult<Folio> {
        validate_quantity(request.quantity)?;
        validate_amount(request.unit_price)?;

        let folio = self
            .store
            .add_line_item(
                &request.folio_id,
                NewLineItem {
                    kind: request.kind,
                    description: request.description.clone(),
                    quantity: request.quantity,
                    unit_price: request.unit_price,
                    date: request.date,
                },
            )
            .await?;
        self.propagate_total(&folio).await?;

        self.store
            .append_audit(self.audit(
                AuditAction::FolioUpdated,
                AuditEntityType::Folio,
                &request.folio_id,
                format!("Added {}: {}", request.kind, request.description),
            ))
            .await?;

        info!(folio = %folio.id, total = %folio.grand_total, "line item added");
        Ok(folio)
    }

    /// Removes a charge by id, recalculates and propagates.
    ///
    /// The system ROOM_CHARGE item is the one line the bill cannot lose;
    /// removal is refused here no matter who the caller is. Re-rating a stay
    /// goes through the booking update path instead.
    pub async fn remove_line_item(&self, folio_id: &str, line_item_id: &str) -> OpsResult<Folio> {
        let folio = self.store.get_folio(folio_id).await?;
        let item = folio
            .line_items
            .iter()
            .find(|li| li.id == line_item_id)
            .ok_or_else(|| OpsError::not_found("Line item", line_item_id))?;
        if item.kind == LineItemType::RoomCharge {
            return Err(OpsError::invalid_state(
                "Room charge line items cannot be removed from the folio",
            ));
        }
        let removed_label = format!("Removed {}: {}", item.kind, item.description);

        let folio = self.store.remove_line_item(folio_id, line_item_id).await?;
        self.propagate_total(&folio).await?;

        self.store
            .append_audit(self.audit(
                AuditAction::FolioUpdated,
                AuditEntityType::Folio,
                folio_id,
                removed_label,
            ))
            .await?;

        Ok(folio)
    }

    /// Sets the flat and percentage discount (replacing, not accumulating),
    /// recalculates and propagates.
    pub async fn apply_discount(
        &self,
        folio_id: &str,
        amount: Money,
        percent: Percent,
    ) -> OpsResult<Folio> {
        validate_amount(amount)?;
        validate_percent(percent)?;

        let folio = self.store.apply_discount(folio_id, amount, percent).await?;
        self.propagate_total(&folio).await?;

        self.store
            .append_audit(self.audit(
                AuditAction::FolioUpdated,
                AuditEntityType::Folio,
                folio_id,
                format!("Discount applied: {amount} + {percent}"),
            ))
            .await?;

        info!(folio = %folio.id, %amount, %percent, total = %folio.grand_total, "discount applied");
        Ok(folio)
    }

    // =========================================================================
    // Payments
    // =========================================================================

    pub async fn payments(&self, booking_id: &str) -> OpsResult<Vec<Payment>> {
        Ok(self.store.payments_for_booking(booking_id).await?)
    }

    /// Records a payment; flips the booking to PAID when the folio is fully
    /// covered.
    pub async fn add_payment(&self, request: AddPaymentRequest) -> OpsResult<Payment> {
        validate_payment_amount(request.amount)?;
        // Fail before writing anything if the booking id is stale.
        let booking = self.store.get_booking(&request.booking_id).await?;

        let payment = self
            .store
            .add_payment(NewPayment {
                folio_id: request.folio_id,
                booking_id: request.booking_id.clone(),
                amount: request.amount,
                method: request.method,
                reference: request.reference,
                notes: request.notes,
                created_by: self.operator.clone(),
            })
            .await?;

        let total_billed = match self.store.folio_for_booking(&booking.id).await? {
            Some(folio) => folio.grand_total,
            None => booking.total_amount,
        };
        let total_paid: Money = self
            .store
            .payments_for_booking(&booking.id)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();
        if total_paid >= total_billed {
            self.store
                .update_booking(
                    &booking.id,
                    BookingPatch {
                        payment_status: Some(PaymentStatus::Paid),
                        ..Default::default()
                    },
                )
                .await?;
        }

        self.store
            .append_audit(self.audit(
                AuditAction::PaymentAdded,
                AuditEntityType::Payment,
                &payment.id,
                format!("Payment received: {} via {}", payment.amount, payment.method),
            ))
            .await?;

        info!(
            booking = %booking.booking_code,
            amount = %payment.amount,
            method = %payment.method,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Edits a payment. Requires a reason; the audit entry carries JSON
    /// snapshots of the payment before and after.
    pub async fn update_payment(
        &self,
        payment_id: &str,
        patch: PaymentPatch,
        reason: impl Into<String>,
    ) -> OpsResult<Payment> {
        if let Some(amount) = patch.amount {
            validate_payment_amount(amount)?;
        }
        let before = self.store.get_payment(payment_id).await?;
        let after = self.store.update_payment(payment_id, patch).await?;

        let mut entry = self.audit(
            AuditAction::PaymentEdited,
            AuditEntityType::Payment,
            payment_id,
            "Payment edited".to_string(),
        );
        entry.previous_value = Some(serde_json::to_string(&before).unwrap_or_default());
        entry.new_value = Some(serde_json::to_string(&after).unwrap_or_default());
        entry.reason = Some(reason.into());
        self.store.append_audit(entry).await?;

        Ok(after)
    }

    /// Deletes a payment. Requires a reason; the audit entry (written before
    /// the deletion, so the record outlives the row) carries a snapshot of
    /// what was deleted. The booking's payment status is then reset per
    /// [`PAYMENT_STATUS_AFTER_DELETE`].
    pub async fn delete_payment(
        &self,
        payment_id: &str,
        reason: impl Into<String>,
    ) -> OpsResult<()> {
        let payment = self.store.get_payment(payment_id).await?;

        let mut entry = self.audit(
            AuditAction::PaymentDeleted,
            AuditEntityType::Payment,
            payment_id,
            format!("Payment deleted: {}", payment.amount),
        );
        entry.previous_value = Some(serde_json::to_string(&payment).unwrap_or_default());
        entry.reason = Some(reason.into());
        self.store.append_audit(entry).await?;

        self.store.delete_payment(payment_id).await?;

        self.store
            .update_booking(
                &payment.booking_id,
                BookingPatch {
                    payment_status: Some(PAYMENT_STATUS_AFTER_DELETE),
                    ..Default::default()
                },
            )
            .await?;

        info!(payment = %payment_id, amount = %payment.amount, "payment deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
