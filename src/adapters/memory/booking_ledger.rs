//! In-memory implementation of BookingLedger.
//!
//! Uniqueness of the payment reference is checked and the record appended
//! under one mutex guard, mirroring what the database constraint guarantees
//! in production.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::booking::Booking;
use crate::domain::foundation::{PaymentReference, UserId};
use crate::ports::{BookingLedger, LedgerError};

/// In-memory `BookingLedger` implementation.
pub struct InMemoryBookingLedger {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingLedger {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Total number of recorded bookings (test convenience).
    pub fn len(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.lock().unwrap().is_empty()
    }
}

impl Default for InMemoryBookingLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingLedger for InMemoryBookingLedger {
    async fn find_by_payment_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<Booking>, LedgerError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.payment_reference == reference)
            .cloned())
    }

    async fn create(&self, booking: &Booking) -> Result<(), LedgerError> {
        // Check and append under one guard: the in-memory equivalent of the
        // storage uniqueness constraint.
        let mut bookings = self.bookings.lock().unwrap();
        if bookings
            .iter()
            .any(|b| b.payment_reference == booking.payment_reference)
        {
            return Err(LedgerError::DuplicatePaymentReference(
                booking.payment_reference.clone(),
            ));
        }
        bookings.push(booking.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, LedgerError> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
