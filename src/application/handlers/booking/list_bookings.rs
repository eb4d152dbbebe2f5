//! ListBookingsHandler - Query handler for a user's booking history.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::UserId;
use crate::ports::{BookingLedger, LedgerError};

/// Query for the authenticated user's bookings.
#[derive(Debug, Clone)]
pub struct ListBookingsQuery {
    pub user_id: UserId,
}

/// Handler returning a user's bookings, newest first.
pub struct ListBookingsHandler {
    ledger: Arc<dyn BookingLedger>,
}

impl ListBookingsHandler {
    pub fn new(ledger: Arc<dyn BookingLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: ListBookingsQuery) -> Result<Vec<Booking>, BookingError> {
        self.ledger
            .list_for_user(&query.user_id)
            .await
            .map_err(|e| match e {
                LedgerError::Storage(message) => BookingError::infrastructure(message),
                other => BookingError::infrastructure(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::PaymentStatus;
    use crate::domain::foundation::{PaymentReference, ShowId};
    use crate::domain::show::SeatSet;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockBookingLedger {
        bookings: Mutex<Vec<Booking>>,
    }

    impl MockBookingLedger {
        fn with_bookings(bookings: Vec<Booking>) -> Self {
            Self {
                bookings: Mutex::new(bookings),
            }
        }
    }

    #[async_trait]
    impl BookingLedger for MockBookingLedger {
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
            self.bookings.lock().unwrap().push(booking.clone());
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

    fn booking_for(user: &str, reference: &str) -> Booking {
        Booking::record(
            ShowId::new(),
            UserId::new(user).unwrap(),
            SeatSet::new([1]).unwrap(),
            PaymentReference::new(reference).unwrap(),
            200,
            PaymentStatus::Succeeded,
        )
    }

    #[tokio::test]
    async fn returns_only_callers_bookings() {
        let ledger = Arc::new(MockBookingLedger::with_bookings(vec![
            booking_for("user-1", "pay_1"),
            booking_for("user-2", "pay_2"),
            booking_for("user-1", "pay_3"),
        ]));
        let handler = ListBookingsHandler::new(ledger);

        let bookings = handler
            .handle(ListBookingsQuery {
                user_id: UserId::new("user-1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(bookings.len(), 2);
        assert!(bookings.iter().all(|b| b.user_id.as_str() == "user-1"));
    }

    #[tokio::test]
    async fn returns_newest_first() {
        let older = booking_for("user-1", "pay_1");
        let mut newer = booking_for("user-1", "pay_2");
        newer.created_at = older.created_at.plus_secs(60);

        let ledger = Arc::new(MockBookingLedger::with_bookings(vec![
            older.clone(),
            newer.clone(),
        ]));
        let handler = ListBookingsHandler::new(ledger);

        let bookings = handler
            .handle(ListBookingsQuery {
                user_id: UserId::new("user-1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(bookings[0].id, newer.id);
        assert_eq!(bookings[1].id, older.id);
    }

    #[tokio::test]
    async fn returns_empty_for_user_without_bookings() {
        let ledger = Arc::new(MockBookingLedger::with_bookings(vec![]));
        let handler = ListBookingsHandler::new(ledger);

        let bookings = handler
            .handle(ListBookingsQuery {
                user_id: UserId::new("user-9").unwrap(),
            })
            .await
            .unwrap();

        assert!(bookings.is_empty());
    }
}
