//! HTTP DTOs (Data Transfer Objects) for booking endpoints.
//!
//! These types define the JSON request/response structure for the booking
//! API. They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, PaymentStatus};
use crate::domain::foundation::ShowId;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a checkout for a set of seats.
///
/// No amount field: the charge is computed server-side from the show's
/// ticket price.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub show_id: ShowId,
    pub seats: Vec<u32>,
}

/// Request to confirm a booking after payment capture.
///
/// The caller's identity comes from the session token, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmBookingRequest {
    pub show_id: ShowId,
    pub seats: Vec<u32>,
    pub payment_reference: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A started checkout, ready for client-side payment capture.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    /// Payment reference to send back on confirmation.
    pub reference: String,
    /// Secret for the payment-capture UI.
    pub client_secret: String,
    /// Amount to be charged, in the smallest currency unit.
    pub amount: i64,
}

/// A committed booking for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: String,
    pub show_id: String,
    pub seats: Vec<u32>,
    /// Amount charged, in the smallest currency unit.
    pub amount: i64,
    pub payment_status: PaymentStatus,
    /// Creation time (ISO 8601).
    pub created_at: String,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            show_id: booking.show_id.to_string(),
            seats: booking.seats.to_vec(),
            amount: booking.amount_minor,
            payment_status: booking.payment_status,
            created_at: booking.created_at.as_datetime().to_rfc3339(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Failure envelope: `{"success": false, "error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Machine-readable code plus human-readable message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiErrorBody {
    /// Create a new error body.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
