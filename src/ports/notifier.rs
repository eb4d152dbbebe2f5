//! Booking notification port - best-effort post-commit side effects.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::show::Show;

/// Port for post-commit booking notifications (e.g., a receipt email).
///
/// # Contract
///
/// Strictly best-effort: the orchestrator hands the booking off after commit
/// without awaiting the outcome, and any failure here is logged, never
/// propagated. A notification failure must not affect the booking result.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    /// Notify the user that their booking was committed.
    async fn booking_confirmed(
        &self,
        booking: &Booking,
        show: &Show,
        recipient: &str,
    ) -> Result<(), NotifyError>;
}

/// Errors from notification delivery.
#[derive(Debug, Clone)]
pub struct NotifyError {
    pub message: String,
}

impl NotifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notification failed: {}", self.message)
    }
}

impl std::error::Error for NotifyError {}
