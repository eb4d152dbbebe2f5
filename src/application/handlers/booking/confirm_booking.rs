//! ConfirmBookingHandler - Command handler for the seat-booking transaction.
//!
//! This is the core state machine of the system. It turns "user wants seats
//! X, Y on show S, paid via reference P" into either a committed booking or
//! a rejection with a specific reason, while holding three guarantees under
//! concurrency:
//!
//! 1. No double booking: for any seat, at most one concurrent attempt wins.
//! 2. Idempotent payment: one payment reference yields at most one booking.
//! 3. No forged claims: the authorization's bound metadata must match the
//!    request exactly.
//!
//! Reservation and ledger insert form one atomic unit of work via a
//! compensating release: if the insert fails after seats were reserved, the
//! reservation is undone before the error is returned.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::{PaymentReference, ShowId, UserId};
use crate::domain::show::{SeatSet, Show};
use crate::ports::{
    BookingLedger, BookingNotifier, GatewayError, InventoryError, LedgerError, PaymentGateway,
    ShowInventory,
};

/// Command to confirm a booking after the client completed payment capture.
#[derive(Debug, Clone)]
pub struct ConfirmBookingCommand {
    pub show_id: ShowId,
    pub seats: SeatSet,
    pub payment_reference: PaymentReference,
    /// Derived from the server-validated session, never from the body.
    pub user_id: UserId,
    /// Receipt recipient; a missing email skips the receipt, not the booking.
    pub email: Option<String>,
}

/// Result of a committed booking.
#[derive(Debug, Clone)]
pub struct ConfirmBookingResult {
    pub booking: Booking,
    pub show: Show,
}

/// Handler for confirming a paid booking.
pub struct ConfirmBookingHandler {
    inventory: Arc<dyn ShowInventory>,
    ledger: Arc<dyn BookingLedger>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn BookingNotifier>,
}

impl ConfirmBookingHandler {
    pub fn new(
        inventory: Arc<dyn ShowInventory>,
        ledger: Arc<dyn BookingLedger>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn BookingNotifier>,
    ) -> Self {
        Self {
            inventory,
            ledger,
            gateway,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmBookingCommand,
    ) -> Result<ConfirmBookingResult, BookingError> {
        // 1. Idempotency pre-check: this payment may already be a booking.
        let existing = self
            .ledger
            .find_by_payment_reference(&cmd.payment_reference)
            .await
            .map_err(ledger_to_booking_error)?;
        if existing.is_some() {
            return Err(BookingError::duplicate_booking(cmd.payment_reference));
        }

        // 2. Verify the payment with the gateway; a single attempt, no retry.
        let authorization = self
            .gateway
            .retrieve_authorization(&cmd.payment_reference)
            .await
            .map_err(gateway_to_booking_error)?;

        if !authorization.status.is_succeeded() {
            return Err(BookingError::payment_not_completed(
                cmd.payment_reference,
                authorization.status,
            ));
        }

        // 3. Cross-check the bound metadata against the request. A mismatch
        //    means the client is replaying a valid payment for a different
        //    booking than it was authorized for.
        let binding = &authorization.binding;
        if binding.user_id != cmd.user_id {
            tracing::warn!(
                payment_reference = %cmd.payment_reference,
                request_user = %cmd.user_id,
                "Payment authorization bound to a different user"
            );
            return Err(BookingError::PaymentUserMismatch);
        }
        if binding.show_id != cmd.show_id {
            tracing::warn!(
                payment_reference = %cmd.payment_reference,
                request_show = %cmd.show_id,
                bound_show = %binding.show_id,
                "Payment authorization bound to a different show"
            );
            return Err(BookingError::ShowMismatch);
        }
        if binding.seats != cmd.seats {
            tracing::warn!(
                payment_reference = %cmd.payment_reference,
                "Payment authorization bound to a different seat set"
            );
            return Err(BookingError::SeatMismatch);
        }

        // 4. Reserve the seats. Only after payment is confirmed: seat
        //    inventory is the scarce resource and must not be locked
        //    against unpaid attempts.
        let show = self
            .inventory
            .reserve_seats(&cmd.show_id, &cmd.seats)
            .await
            .map_err(|e| inventory_to_booking_error(cmd.show_id, e))?;

        // 5. Write the booking. Amount and status come from the verified
        //    authorization, never from client input.
        let booking = Booking::record(
            cmd.show_id,
            cmd.user_id,
            cmd.seats.clone(),
            cmd.payment_reference.clone(),
            authorization.amount_minor,
            authorization.status,
        );

        if let Err(err) = self.ledger.create(&booking).await {
            // The seats were reserved but the booking cannot be recorded:
            // release the reservation so the seats don't become permanently
            // unbookable with no corresponding booking record.
            if let Err(release_err) = self
                .inventory
                .release_seats(&cmd.show_id, &cmd.seats)
                .await
            {
                tracing::error!(
                    show_id = %cmd.show_id,
                    payment_reference = %cmd.payment_reference,
                    error = %release_err,
                    "Failed to release seats after ledger insert failure"
                );
            }

            return Err(match err {
                // Two confirmations for the same payment raced past the
                // pre-check; the storage constraint caught the second.
                LedgerError::DuplicatePaymentReference(reference) => {
                    BookingError::duplicate_booking(reference)
                }
                LedgerError::Storage(message) => {
                    tracing::error!(
                        show_id = %cmd.show_id,
                        payment_reference = %cmd.payment_reference,
                        error = %message,
                        "Booking insert failed after seat reservation"
                    );
                    BookingError::infrastructure(message)
                }
            });
        }

        tracing::info!(
            booking_id = %booking.id,
            show_id = %booking.show_id,
            user_id = %booking.user_id,
            amount_minor = booking.amount_minor,
            "Booking committed"
        );

        // 6. Post-commit side effect, fire-and-forget. Failure here is
        //    logged and never affects the already-committed result.
        match cmd.email {
            Some(recipient) => {
                let notifier = Arc::clone(&self.notifier);
                let booking_for_receipt = booking.clone();
                let show_for_receipt = show.clone();
                tokio::spawn(async move {
                    if let Err(e) = notifier
                        .booking_confirmed(&booking_for_receipt, &show_for_receipt, &recipient)
                        .await
                    {
                        tracing::warn!(
                            booking_id = %booking_for_receipt.id,
                            error = %e,
                            "Booking receipt notification failed"
                        );
                    }
                });
            }
            None => {
                tracing::debug!(
                    booking_id = %booking.id,
                    "No email on session; skipping booking receipt"
                );
            }
        }

        Ok(ConfirmBookingResult { booking, show })
    }
}

fn gateway_to_booking_error(err: GatewayError) -> BookingError {
    BookingError::gateway(err.message, err.retryable)
}

fn ledger_to_booking_error(err: LedgerError) -> BookingError {
    match err {
        LedgerError::DuplicatePaymentReference(reference) => {
            BookingError::duplicate_booking(reference)
        }
        LedgerError::Storage(message) => BookingError::infrastructure(message),
    }
}

fn inventory_to_booking_error(show_id: ShowId, err: InventoryError) -> BookingError {
    match err {
        InventoryError::ShowNotFound(id) => BookingError::show_not_found(id),
        InventoryError::SeatConflict { taken } => BookingError::seat_conflict(show_id, taken),
        InventoryError::SeatOutOfRange { seat, total_seats } => BookingError::invalid_request(
            "seats",
            format!("seat {} exceeds show capacity of {}", seat, total_seats),
        ),
        InventoryError::Storage(message) => BookingError::infrastructure(message),
    }
}
