//! Booking ledger port - the durable record of completed bookings.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{PaymentReference, UserId};

/// Port for the booking ledger.
///
/// # Contract
///
/// Implementations must enforce uniqueness of the payment reference at the
/// storage layer. The orchestrator's pre-check via
/// `find_by_payment_reference` is not sufficient on its own: two requests
/// for the same payment can both pass the pre-check before either writes.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Look up a booking by its payment reference (idempotency pre-check).
    async fn find_by_payment_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<Booking>, LedgerError>;

    /// Insert a new booking record.
    ///
    /// Fails with [`LedgerError::DuplicatePaymentReference`] if the payment
    /// reference already exists.
    async fn create(&self, booking: &Booking) -> Result<(), LedgerError>;

    /// All bookings for a user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, LedgerError>;
}

/// Errors from booking ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The payment reference already exists; one payment yields at most one
    /// booking.
    DuplicatePaymentReference(PaymentReference),

    /// Storage failure.
    Storage(String),
}

impl LedgerError {
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage(message.into())
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::DuplicatePaymentReference(reference) => {
                write!(f, "Duplicate payment reference: {}", reference)
            }
            LedgerError::Storage(msg) => write!(f, "Ledger storage error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}
