//! Booking-specific error types.
//!
//! Every rejection of a booking attempt carries a stable machine-readable
//! code plus a human-readable message; no error silently converts into a
//! partial success.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidRequest | 400 |
//! | ShowNotFound | 404 |
//! | SeatConflict | 409 |
//! | DuplicateBooking | 409 |
//! | PaymentNotCompleted | 402 |
//! | PaymentUserMismatch | 403 |
//! | ShowMismatch | 400 |
//! | SeatMismatch | 400 |
//! | Gateway | 502 |
//! | Infrastructure | 500 |

use crate::domain::booking::PaymentStatus;
use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentReference, ShowId, ValidationError,
};

/// Booking-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The request was malformed before any external call was made.
    InvalidRequest { field: String, message: String },

    /// The referenced show does not exist.
    ShowNotFound(ShowId),

    /// One or more requested seats are already booked. First writer wins;
    /// an expected, user-recoverable outcome.
    SeatConflict { show_id: ShowId, taken: Vec<u32> },

    /// This payment reference was already converted into a booking.
    DuplicateBooking(PaymentReference),

    /// The payment authorization is not in the succeeded state.
    PaymentNotCompleted {
        reference: PaymentReference,
        status: PaymentStatus,
    },

    /// The authorization was created for a different user.
    PaymentUserMismatch,

    /// The authorization was created for a different show.
    ShowMismatch,

    /// The authorization was created for a different seat set.
    SeatMismatch,

    /// The payment gateway was unreachable or returned an error.
    Gateway { message: String, retryable: bool },

    /// Storage failure or broken invariant; the attempt was rolled back.
    Infrastructure(String),
}

impl BookingError {
    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn show_not_found(show_id: ShowId) -> Self {
        BookingError::ShowNotFound(show_id)
    }

    pub fn seat_conflict(show_id: ShowId, taken: Vec<u32>) -> Self {
        BookingError::SeatConflict { show_id, taken }
    }

    pub fn duplicate_booking(reference: PaymentReference) -> Self {
        BookingError::DuplicateBooking(reference)
    }

    pub fn payment_not_completed(reference: PaymentReference, status: PaymentStatus) -> Self {
        BookingError::PaymentNotCompleted { reference, status }
    }

    pub fn gateway(message: impl Into<String>, retryable: bool) -> Self {
        BookingError::Gateway {
            message: message.into(),
            retryable,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::InvalidRequest { .. } => ErrorCode::InvalidBookingRequest,
            BookingError::ShowNotFound(_) => ErrorCode::ShowNotFound,
            BookingError::SeatConflict { .. } => ErrorCode::SeatConflict,
            BookingError::DuplicateBooking(_) => ErrorCode::DuplicateBooking,
            BookingError::PaymentNotCompleted { .. } => ErrorCode::PaymentNotCompleted,
            BookingError::PaymentUserMismatch => ErrorCode::PaymentUserMismatch,
            BookingError::ShowMismatch => ErrorCode::ShowMismatch,
            BookingError::SeatMismatch => ErrorCode::SeatMismatch,
            BookingError::Gateway { .. } => ErrorCode::GatewayError,
            BookingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            BookingError::InvalidRequest { field, message } => {
                format!("Invalid booking request ('{}'): {}", field, message)
            }
            BookingError::ShowNotFound(show_id) => format!("Show not found: {}", show_id),
            BookingError::SeatConflict { taken, .. } => {
                let seats: Vec<String> = taken.iter().map(u32::to_string).collect();
                format!("Seats already booked: {}", seats.join(", "))
            }
            BookingError::DuplicateBooking(reference) => {
                format!("Payment {} was already used for a booking", reference)
            }
            BookingError::PaymentNotCompleted { reference, status } => {
                format!("Payment {} has not completed (status: {})", reference, status)
            }
            BookingError::PaymentUserMismatch => {
                "Payment was authorized for a different user".to_string()
            }
            BookingError::ShowMismatch => {
                "Payment was authorized for a different show".to_string()
            }
            BookingError::SeatMismatch => {
                "Payment was authorized for different seats".to_string()
            }
            BookingError::Gateway { message, .. } => {
                format!("Payment gateway error: {}", message)
            }
            BookingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Expected, user-recoverable conflict outcomes (not logged as failures).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BookingError::SeatConflict { .. } | BookingError::DuplicateBooking(_)
        )
    }

    /// Trust-boundary violations, flagged for audit.
    pub fn is_tampering(&self) -> bool {
        matches!(
            self,
            BookingError::PaymentUserMismatch
                | BookingError::ShowMismatch
                | BookingError::SeatMismatch
        )
    }

    /// Returns true if the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            BookingError::Gateway { retryable, .. } => *retryable,
            BookingError::Infrastructure(_) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::OutOfRange { field, .. } => field.clone(),
            ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        BookingError::invalid_request(field, err.to_string())
    }
}

impl From<BookingError> for DomainError {
    fn from(err: BookingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
