//! Integration tests for the seat-booking transaction.
//!
//! These tests drive the real command handlers over the in-memory adapters
//! and the mock payment gateway, including genuinely concurrent booking
//! attempts racing for the same seats and the same payment reference.

use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::sync::Barrier;

use marquee::adapters::memory::{InMemoryBookingLedger, InMemoryShowInventory};
use marquee::adapters::stripe::MockPaymentGateway;
use marquee::application::handlers::booking::{
    ConfirmBookingCommand, ConfirmBookingHandler, ListBookingsHandler, ListBookingsQuery,
    StartCheckoutCommand, StartCheckoutHandler,
};
use marquee::domain::booking::{Booking, BookingError, PaymentStatus};
use marquee::domain::foundation::{PaymentReference, ShowId, Timestamp, UserId};
use marquee::domain::show::{SeatSet, Show};
use marquee::ports::{
    AuthorizationBinding, BookingLedger, BookingNotifier, LedgerError, NotifyError,
    PaymentAuthorization, ShowInventory,
};

use async_trait::async_trait;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Notifier that records recipients, for asserting the post-commit side
/// effect fires without being awaited.
struct CollectingNotifier {
    recipients: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    fn new() -> Self {
        Self {
            recipients: Mutex::new(Vec::new()),
        }
    }

    fn recipients(&self) -> Vec<String> {
        self.recipients.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingNotifier for CollectingNotifier {
    async fn booking_confirmed(
        &self,
        _booking: &Booking,
        _show: &Show,
        recipient: &str,
    ) -> Result<(), NotifyError> {
        self.recipients.lock().unwrap().push(recipient.to_string());
        Ok(())
    }
}

/// Ledger whose insert always fails, to force the rollback path after a
/// successful seat reservation.
struct FailingLedger;

#[async_trait]
impl BookingLedger for FailingLedger {
    async fn find_by_payment_reference(
        &self,
        _reference: &PaymentReference,
    ) -> Result<Option<Booking>, LedgerError> {
        Ok(None)
    }

    async fn create(&self, _booking: &Booking) -> Result<(), LedgerError> {
        Err(LedgerError::storage("Simulated insert failure"))
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Booking>, LedgerError> {
        Ok(vec![])
    }
}

struct TestApp {
    inventory: Arc<InMemoryShowInventory>,
    ledger: Arc<InMemoryBookingLedger>,
    gateway: Arc<MockPaymentGateway>,
    notifier: Arc<CollectingNotifier>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            inventory: Arc::new(InMemoryShowInventory::new()),
            ledger: Arc::new(InMemoryBookingLedger::new()),
            gateway: Arc::new(MockPaymentGateway::new()),
            notifier: Arc::new(CollectingNotifier::new()),
        }
    }

    fn with_show(self, show_id: ShowId, total_seats: u32, price_minor: i64) -> Self {
        self.inventory.insert(
            Show::new(
                show_id,
                "Evening Screening",
                Timestamp::now(),
                price_minor,
                total_seats,
            )
            .unwrap(),
        );
        self
    }

    fn confirm_handler(&self) -> ConfirmBookingHandler {
        ConfirmBookingHandler::new(
            self.inventory.clone(),
            self.ledger.clone(),
            self.gateway.clone(),
            self.notifier.clone(),
        )
    }

    fn checkout_handler(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(self.inventory.clone(), self.gateway.clone())
    }

    fn seed_succeeded(
        &self,
        reference: &str,
        show_id: ShowId,
        seats: &[u32],
        user: &str,
        amount_minor: i64,
    ) {
        self.gateway.seed(PaymentAuthorization {
            reference: PaymentReference::new(reference).unwrap(),
            status: PaymentStatus::Succeeded,
            amount_minor,
            binding: AuthorizationBinding {
                show_id,
                seats: SeatSet::new(seats.iter().copied()).unwrap(),
                user_id: UserId::new(user).unwrap(),
            },
        });
    }

    fn booked_seats(&self, show_id: &ShowId) -> Vec<u32> {
        futures::executor::block_on(self.inventory.find(show_id))
            .unwrap()
            .map(|s| s.booked_seats.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn confirm_command(show_id: ShowId, seats: &[u32], reference: &str, user: &str) -> ConfirmBookingCommand {
    ConfirmBookingCommand {
        show_id,
        seats: SeatSet::new(seats.iter().copied()).unwrap(),
        payment_reference: PaymentReference::new(reference).unwrap(),
        user_id: UserId::new(user).unwrap(),
        email: Some(format!("{}@example.com", user)),
    }
}

// =============================================================================
// Example Scenario
// =============================================================================

#[tokio::test]
async fn booking_flow_example_scenario() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);
    let handler = app.confirm_handler();

    // User books seats [10, 11] via pay_1 with a verified 400 charge.
    app.seed_succeeded("pay_1", show_id, &[10, 11], "user-a", 400);
    let result = handler
        .handle(confirm_command(show_id, &[10, 11], "pay_1", "user-a"))
        .await
        .unwrap();

    assert_eq!(result.booking.seats.to_vec(), vec![10, 11]);
    assert_eq!(result.booking.amount_minor, 400);
    assert_eq!(app.booked_seats(&show_id), vec![10, 11]);

    // A second payment for overlapping seats [11, 12] conflicts.
    app.seed_succeeded("pay_2", show_id, &[11, 12], "user-b", 400);
    let conflict = handler
        .handle(confirm_command(show_id, &[11, 12], "pay_2", "user-b"))
        .await;
    match conflict {
        Err(BookingError::SeatConflict { taken, .. }) => assert_eq!(taken, vec![11]),
        other => panic!("Expected SeatConflict, got {:?}", other),
    }

    // Replaying pay_1 is a duplicate booking.
    let replay = handler
        .handle(confirm_command(show_id, &[10, 11], "pay_1", "user-a"))
        .await;
    assert!(matches!(replay, Err(BookingError::DuplicateBooking(_))));

    // Exactly one booking was committed, seat 12 stayed free.
    assert_eq!(app.ledger.len(), 1);
    assert_eq!(app.booked_seats(&show_id), vec![10, 11]);
}

// =============================================================================
// No Double Booking Under Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_overlapping_bookings_commit_at_most_once() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);

    // Eight users, each with a verified payment for the same two seats.
    const ATTEMPTS: usize = 8;
    for i in 0..ATTEMPTS {
        app.seed_succeeded(
            &format!("pay_{}", i),
            show_id,
            &[7, 8],
            &format!("user-{}", i),
            400,
        );
    }

    let handler = Arc::new(app.confirm_handler());
    let barrier = Arc::new(Barrier::new(ATTEMPTS));

    let tasks: Vec<_> = (0..ATTEMPTS)
        .map(|i| {
            let handler = handler.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                handler
                    .handle(confirm_command(
                        show_id,
                        &[7, 8],
                        &format!("pay_{}", i),
                        &format!("user-{}", i),
                    ))
                    .await
            })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one overlapping attempt may win");

    for result in results.iter().filter(|r| r.is_err()) {
        match result {
            Err(BookingError::SeatConflict { .. }) => {}
            other => panic!("Losers must observe SeatConflict, got {:?}", other),
        }
    }

    assert_eq!(app.ledger.len(), 1);
    assert_eq!(app.booked_seats(&show_id), vec![7, 8]);
}

#[tokio::test]
async fn concurrent_disjoint_bookings_all_commit() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);

    const ATTEMPTS: u32 = 6;
    for i in 0..ATTEMPTS {
        let seat = i * 2 + 1;
        app.seed_succeeded(
            &format!("pay_{}", i),
            show_id,
            &[seat, seat + 1],
            &format!("user-{}", i),
            400,
        );
    }

    let handler = Arc::new(app.confirm_handler());
    let barrier = Arc::new(Barrier::new(ATTEMPTS as usize));

    let tasks: Vec<_> = (0..ATTEMPTS)
        .map(|i| {
            let handler = handler.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                let seat = i * 2 + 1;
                barrier.wait().await;
                handler
                    .handle(confirm_command(
                        show_id,
                        &[seat, seat + 1],
                        &format!("pay_{}", i),
                        &format!("user-{}", i),
                    ))
                    .await
            })
        })
        .collect();

    let results: Vec<_> = join_all(tasks).await;
    assert!(results
        .into_iter()
        .map(|joined| joined.unwrap())
        .all(|r| r.is_ok()));

    assert_eq!(app.ledger.len(), ATTEMPTS as usize);
    assert_eq!(
        app.booked_seats(&show_id),
        (1..=ATTEMPTS * 2).collect::<Vec<u32>>()
    );
}

// =============================================================================
// Idempotent Payment
// =============================================================================

#[tokio::test]
async fn same_payment_reference_commits_exactly_one_booking() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);
    app.seed_succeeded("pay_1", show_id, &[3], "user-a", 200);

    let handler = app.confirm_handler();

    let first = handler
        .handle(confirm_command(show_id, &[3], "pay_1", "user-a"))
        .await;
    assert!(first.is_ok());

    let second = handler
        .handle(confirm_command(show_id, &[3], "pay_1", "user-a"))
        .await;
    assert!(matches!(second, Err(BookingError::DuplicateBooking(_))));

    assert_eq!(app.ledger.len(), 1);
}

#[tokio::test]
async fn concurrent_same_payment_reference_commits_exactly_one_booking() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);
    app.seed_succeeded("pay_1", show_id, &[3, 4], "user-a", 400);

    let handler = Arc::new(app.confirm_handler());
    let barrier = Arc::new(Barrier::new(4));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let handler = handler.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                handler
                    .handle(confirm_command(show_id, &[3, 4], "pay_1", "user-a"))
                    .await
            })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "one payment yields exactly one booking");

    // Losers observe a conflict outcome: the duplicate reference, or the
    // seat conflict left by the winner, depending on interleaving.
    for result in results.iter().filter(|r| r.is_err()) {
        match result {
            Err(err) => assert!(err.is_conflict(), "unexpected loser error: {:?}", err),
            Ok(_) => unreachable!(),
        }
    }

    assert_eq!(app.ledger.len(), 1);
    assert_eq!(app.booked_seats(&show_id), vec![3, 4]);
}

// =============================================================================
// Tamper Rejection
// =============================================================================

#[tokio::test]
async fn replaying_authorization_against_other_show_or_seats_is_rejected() {
    let bound_show = ShowId::new();
    let other_show = ShowId::new();
    let app = TestApp::new()
        .with_show(bound_show, 50, 200)
        .with_show(other_show, 50, 200);

    app.seed_succeeded("pay_1", bound_show, &[1, 2], "user-a", 400);
    let handler = app.confirm_handler();

    let wrong_show = handler
        .handle(confirm_command(other_show, &[1, 2], "pay_1", "user-a"))
        .await;
    assert!(matches!(wrong_show, Err(BookingError::ShowMismatch)));

    let wrong_seats = handler
        .handle(confirm_command(bound_show, &[3, 4], "pay_1", "user-a"))
        .await;
    assert!(matches!(wrong_seats, Err(BookingError::SeatMismatch)));

    let wrong_user = handler
        .handle(confirm_command(bound_show, &[1, 2], "pay_1", "user-b"))
        .await;
    assert!(matches!(wrong_user, Err(BookingError::PaymentUserMismatch)));

    // No rejected attempt touched inventory or the ledger.
    assert!(app.ledger.is_empty());
    assert!(app.booked_seats(&bound_show).is_empty());
    assert!(app.booked_seats(&other_show).is_empty());
}

// =============================================================================
// Atomicity (Rollback)
// =============================================================================

#[tokio::test]
async fn failed_booking_insert_releases_reserved_seats() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);
    app.seed_succeeded("pay_1", show_id, &[5, 6], "user-a", 400);

    let handler = ConfirmBookingHandler::new(
        app.inventory.clone(),
        Arc::new(FailingLedger),
        app.gateway.clone(),
        app.notifier.clone(),
    );

    let result = handler
        .handle(confirm_command(show_id, &[5, 6], "pay_1", "user-a"))
        .await;
    assert!(matches!(result, Err(BookingError::Infrastructure(_))));

    // The reservation was rolled back; the seats are bookable again.
    assert!(app.booked_seats(&show_id).is_empty());

    app.seed_succeeded("pay_2", show_id, &[5, 6], "user-b", 400);
    let retry = app
        .confirm_handler()
        .handle(confirm_command(show_id, &[5, 6], "pay_2", "user-b"))
        .await;
    assert!(retry.is_ok());
}

// =============================================================================
// Amount Integrity
// =============================================================================

#[tokio::test]
async fn committed_amount_is_the_verified_authorization_amount() {
    let show_id = ShowId::new();
    // Ticket price 200 x 2 seats would be 400; the processor actually
    // charged 999. The booking must record what was charged.
    let app = TestApp::new().with_show(show_id, 50, 200);
    app.seed_succeeded("pay_1", show_id, &[10, 11], "user-a", 999);

    let result = app
        .confirm_handler()
        .handle(confirm_command(show_id, &[10, 11], "pay_1", "user-a"))
        .await
        .unwrap();

    assert_eq!(result.booking.amount_minor, 999);
}

// =============================================================================
// Full Checkout-Then-Confirm Flow
// =============================================================================

#[tokio::test]
async fn checkout_then_capture_then_confirm_flow() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 250);
    // Pending until "captured", like a real processor.
    let gateway = Arc::new(MockPaymentGateway::new().with_initial_status(PaymentStatus::Pending));
    let app = TestApp { gateway, ..app };

    let checkout = app
        .checkout_handler()
        .handle(StartCheckoutCommand {
            show_id,
            seats: SeatSet::new([20, 21]).unwrap(),
            user_id: UserId::new("user-a").unwrap(),
        })
        .await
        .unwrap();

    // Server-side amount: 2 seats at 250.
    assert_eq!(checkout.amount_minor, 500);

    let confirm_handler = app.confirm_handler();
    let cmd = ConfirmBookingCommand {
        show_id,
        seats: SeatSet::new([20, 21]).unwrap(),
        payment_reference: checkout.reference.clone(),
        user_id: UserId::new("user-a").unwrap(),
        email: Some("user-a@example.com".to_string()),
    };

    // Before capture completes, the booking is rejected.
    let premature = confirm_handler.handle(cmd.clone()).await;
    assert!(matches!(
        premature,
        Err(BookingError::PaymentNotCompleted { .. })
    ));

    // Capture completes; confirmation commits with the bound facts.
    app.gateway.settle(&checkout.reference, PaymentStatus::Succeeded);
    let result = confirm_handler.handle(cmd).await.unwrap();

    assert_eq!(result.booking.amount_minor, 500);
    assert_eq!(app.booked_seats(&show_id), vec![20, 21]);

    // The receipt eventually reaches the notifier without being awaited.
    for _ in 0..50 {
        if !app.notifier.recipients().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(app.notifier.recipients(), vec!["user-a@example.com"]);
}

// =============================================================================
// Booking History
// =============================================================================

#[tokio::test]
async fn booking_history_is_per_user_and_newest_first() {
    let show_id = ShowId::new();
    let app = TestApp::new().with_show(show_id, 50, 200);
    let handler = app.confirm_handler();

    app.seed_succeeded("pay_1", show_id, &[1], "user-a", 200);
    handler
        .handle(confirm_command(show_id, &[1], "pay_1", "user-a"))
        .await
        .unwrap();

    app.seed_succeeded("pay_2", show_id, &[2], "user-b", 200);
    handler
        .handle(confirm_command(show_id, &[2], "pay_2", "user-b"))
        .await
        .unwrap();

    app.seed_succeeded("pay_3", show_id, &[3], "user-a", 200);
    handler
        .handle(confirm_command(show_id, &[3], "pay_3", "user-a"))
        .await
        .unwrap();

    let history = ListBookingsHandler::new(app.ledger.clone())
        .handle(ListBookingsQuery {
            user_id: UserId::new("user-a").unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|b| b.user_id.as_str() == "user-a"));
    // Newest first.
    assert!(history[0].created_at >= history[1].created_at);
}
