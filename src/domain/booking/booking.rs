//! Booking record and payment status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, PaymentReference, ShowId, Timestamp, UserId};
use crate::domain::show::SeatSet;

/// Status of a payment authorization at the external processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Authorization created but not yet completed.
    Pending,

    /// Charge completed; the only status that permits a booking.
    Succeeded,

    /// Charge failed or was canceled.
    Failed,
}

impl PaymentStatus {
    /// Whether this is the terminal success state.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed, paid reservation.
///
/// Created exactly once by the booking orchestrator on successful commit and
/// never mutated afterwards. The payment reference is globally unique; the
/// ledger's storage constraint enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub show_id: ShowId,
    pub user_id: UserId,
    pub seats: SeatSet,
    pub payment_reference: PaymentReference,
    /// Amount actually charged, in the smallest currency unit. Copied from
    /// the verified payment authorization, never from client input.
    pub amount_minor: i64,
    /// Payment status at commit time.
    pub payment_status: PaymentStatus,
    pub created_at: Timestamp,
}

impl Booking {
    /// Records a new booking from verified payment details.
    pub fn record(
        show_id: ShowId,
        user_id: UserId,
        seats: SeatSet,
        payment_reference: PaymentReference,
        amount_minor: i64,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            id: BookingId::new(),
            show_id,
            user_id,
            seats,
            payment_reference,
            amount_minor,
            payment_status,
            created_at: Timestamp::now(),
        }
    }
}
