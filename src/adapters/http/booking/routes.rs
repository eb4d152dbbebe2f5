//! Axum router configuration for booking endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{confirm_booking, list_bookings, start_checkout, BookingAppState};

/// Create the booking API router.
///
/// # Routes (all require authentication)
///
/// - `POST /checkout` - Create a payment authorization for selected seats
/// - `POST /` - Confirm a booking for a completed payment
/// - `GET /` - The caller's bookings, newest first
///
/// Mount at `/api/bookings` behind the auth middleware.
pub fn booking_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/", post(confirm_booking).get(list_bookings))
        .route("/checkout", post(start_checkout))
}
