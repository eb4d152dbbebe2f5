//! Booking command and query handlers.
//!
//! - `StartCheckoutHandler` - create a payment authorization for seats
//! - `ConfirmBookingHandler` - the core seat-booking transaction
//! - `ListBookingsHandler` - booking history read path

mod confirm_booking;
mod list_bookings;
mod start_checkout;

pub use confirm_booking::{ConfirmBookingCommand, ConfirmBookingHandler, ConfirmBookingResult};
pub use list_bookings::{ListBookingsHandler, ListBookingsQuery};
pub use start_checkout::{CheckoutStarted, StartCheckoutCommand, StartCheckoutHandler};
