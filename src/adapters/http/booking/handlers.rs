//! HTTP handlers for booking endpoints.
//!
//! These handlers connect axum routes to application layer command/query
//! handlers. The caller's identity always comes from the `RequireAuth`
//! extractor (server-validated session), never from the request body.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::booking::{
    ConfirmBookingCommand, ConfirmBookingHandler, ListBookingsHandler, ListBookingsQuery,
    StartCheckoutCommand, StartCheckoutHandler,
};
use crate::domain::booking::BookingError;
use crate::domain::foundation::{ErrorCode, PaymentReference};
use crate::domain::show::SeatSet;
use crate::ports::{BookingLedger, BookingNotifier, PaymentGateway, ShowInventory};

use super::super::middleware::RequireAuth;
use super::dto::{
    ApiErrorBody, ApiSuccess, BookingView, CheckoutRequest, CheckoutView, ConfirmBookingRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all booking dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped
/// dependencies for efficient sharing across handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub inventory: Arc<dyn ShowInventory>,
    pub ledger: Arc<dyn BookingLedger>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn BookingNotifier>,
}

impl BookingAppState {
    /// Create handlers on demand from the shared state.
    pub fn start_checkout_handler(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(self.inventory.clone(), self.gateway.clone())
    }

    pub fn confirm_booking_handler(&self) -> ConfirmBookingHandler {
        ConfirmBookingHandler::new(
            self.inventory.clone(),
            self.ledger.clone(),
            self.gateway.clone(),
            self.notifier.clone(),
        )
    }

    pub fn list_bookings_handler(&self) -> ListBookingsHandler {
        ListBookingsHandler::new(self.ledger.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings/checkout - Create a payment authorization for seats.
pub async fn start_checkout(
    State(state): State<BookingAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let seats = SeatSet::new(request.seats).map_err(BookingError::from)?;

    let handler = state.start_checkout_handler();
    let cmd = StartCheckoutCommand {
        show_id: request.show_id,
        seats,
        user_id: user.id,
    };

    let result = handler.handle(cmd).await?;

    let response = ApiSuccess::new(CheckoutView {
        reference: result.reference.to_string(),
        client_secret: result.client_secret,
        amount: result.amount_minor,
    });

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/bookings - Confirm a booking for a completed payment.
pub async fn confirm_booking(
    State(state): State<BookingAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ConfirmBookingRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let seats = SeatSet::new(request.seats).map_err(BookingError::from)?;
    let payment_reference =
        PaymentReference::new(request.payment_reference).map_err(BookingError::from)?;

    let handler = state.confirm_booking_handler();
    let cmd = ConfirmBookingCommand {
        show_id: request.show_id,
        seats,
        payment_reference,
        user_id: user.id,
        email: user.email,
    };

    let result = handler.handle(cmd).await?;

    let response = ApiSuccess::new(BookingView::from(result.booking));
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/bookings - The authenticated user's bookings, newest first.
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.list_bookings_handler();
    let query = ListBookingsQuery { user_id: user.id };

    let bookings = handler.handle(query).await?;

    let views: Vec<BookingView> = bookings.into_iter().map(BookingView::from).collect();
    Ok(Json(ApiSuccess::new(views)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts booking errors to HTTP responses.
pub struct BookingApiError(BookingError);

impl From<BookingError> for BookingApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            // Expected conflicts, recoverable by the user.
            BookingError::SeatConflict { .. } | BookingError::DuplicateBooking(_) => {
                StatusCode::CONFLICT
            }
            BookingError::InvalidRequest { .. }
            | BookingError::ShowMismatch
            | BookingError::SeatMismatch => StatusCode::BAD_REQUEST,
            BookingError::PaymentUserMismatch => StatusCode::FORBIDDEN,
            BookingError::PaymentNotCompleted { .. } => StatusCode::PAYMENT_REQUIRED,
            BookingError::ShowNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Gateway { retryable, .. } => {
                if *retryable {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            BookingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay server-side; the orchestrator already logged
        // the full context.
        let body = if let BookingError::Infrastructure(_) = &self.0 {
            ApiErrorBody::new(ErrorCode::InternalError.to_string(), "Internal error")
        } else {
            ApiErrorBody::new(self.0.code().to_string(), self.0.message())
        };

        (status, Json(body)).into_response()
    }
}
