//! StartCheckoutHandler - Command handler for initiating payment capture.
//!
//! Computes the charge server-side from the show's ticket price and binds
//! the booking facts into the payment authorization. The client receives the
//! processor reference and client secret to complete capture; the booking
//! itself only happens later, in `ConfirmBookingHandler`, after the payment
//! is verified.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::foundation::{PaymentReference, ShowId, UserId};
use crate::domain::show::SeatSet;
use crate::ports::{CreateAuthorizationRequest, InventoryError, PaymentGateway, ShowInventory};

/// Command to start a checkout for a set of seats.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub show_id: ShowId,
    pub seats: SeatSet,
    /// Derived from the server-validated session, never from the body.
    pub user_id: UserId,
}

/// Result of a successfully initiated checkout.
#[derive(Debug, Clone)]
pub struct CheckoutStarted {
    pub reference: PaymentReference,
    pub client_secret: String,
    /// Amount that will be charged, in the smallest currency unit.
    pub amount_minor: i64,
}

/// Handler for starting a paid checkout.
pub struct StartCheckoutHandler {
    inventory: Arc<dyn ShowInventory>,
    gateway: Arc<dyn PaymentGateway>,
}

impl StartCheckoutHandler {
    pub fn new(inventory: Arc<dyn ShowInventory>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { inventory, gateway }
    }

    pub async fn handle(&self, cmd: StartCheckoutCommand) -> Result<CheckoutStarted, BookingError> {
        let show = self
            .inventory
            .find(&cmd.show_id)
            .await
            .map_err(|e| match e {
                InventoryError::Storage(message) => BookingError::infrastructure(message),
                other => BookingError::infrastructure(other.to_string()),
            })?
            .ok_or(BookingError::ShowNotFound(cmd.show_id))?;

        if !show.seats_in_range(&cmd.seats) {
            return Err(BookingError::invalid_request(
                "seats",
                format!(
                    "seat {} exceeds show capacity of {}",
                    cmd.seats.max_seat(),
                    show.total_seats
                ),
            ));
        }

        // Courtesy availability check before sending the user to payment.
        // Read-only: seats are not locked against unpaid attempts, so the
        // authoritative check-and-write happens at confirmation time.
        let taken = show.taken_from(&cmd.seats);
        if !taken.is_empty() {
            return Err(BookingError::seat_conflict(cmd.show_id, taken));
        }

        // The amount is computed here and bound processor-side; it is never
        // accepted from the client.
        let amount_minor = show.price_for(&cmd.seats);

        let created = self
            .gateway
            .create_authorization(CreateAuthorizationRequest {
                show_id: cmd.show_id,
                seats: cmd.seats,
                user_id: cmd.user_id,
                amount_minor,
            })
            .await
            .map_err(|e| BookingError::gateway(e.message, e.retryable))?;

        tracing::debug!(
            show_id = %cmd.show_id,
            reference = %created.reference,
            amount_minor = created.amount_minor,
            "Checkout started"
        );

        Ok(CheckoutStarted {
            reference: created.reference,
            client_secret: created.client_secret,
            amount_minor: created.amount_minor,
        })
    }
}
