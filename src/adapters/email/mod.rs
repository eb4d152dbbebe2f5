//! Email adapters.
//!
//! - `ResendReceiptNotifier` - booking receipts over the Resend API
//! - `templates` - `#{placeholder}` HTML template rendering

mod receipt_notifier;
mod templates;

pub use receipt_notifier::ResendReceiptNotifier;
pub use templates::{load_template, render, BOOKING_RECEIPT_TEMPLATE};
