//! Payment gateway port for external payment processing.
//!
//! Defines the contract for payment processor integrations (e.g., Stripe).
//! The processor is treated as an opaque, trusted oracle of payment status:
//! the booking core never stores card details and never trusts
//! client-supplied payment facts without re-verification here.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment processor
//! - **Metadata binding**: show, seats, and user are fixed into the
//!   authorization at creation, so verification never trusts the client
//! - **Single attempt**: the orchestrator performs no retries; retry policy
//!   belongs to the caller

use crate::domain::booking::PaymentStatus;
use crate::domain::foundation::{PaymentReference, ShowId, UserId};
use crate::domain::show::SeatSet;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment gateway integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Prepare a charge at the external processor.
    ///
    /// Binds `show_id`, `seats`, and `user_id` into processor-side metadata
    /// so later verification does not need to trust client-supplied values
    /// for those fields.
    async fn create_authorization(
        &self,
        request: CreateAuthorizationRequest,
    ) -> Result<CreatedAuthorization, GatewayError>;

    /// Fetch the current state of an authorization by reference.
    ///
    /// Must be idempotent and side-effect-free.
    async fn retrieve_authorization(
        &self,
        reference: &PaymentReference,
    ) -> Result<PaymentAuthorization, GatewayError>;
}

/// Request to prepare a charge.
#[derive(Debug, Clone)]
pub struct CreateAuthorizationRequest {
    pub show_id: ShowId,
    pub seats: SeatSet,
    pub user_id: UserId,
    /// Amount to charge, in the smallest currency unit. Computed server-side
    /// from the show's ticket price, never accepted from the client.
    pub amount_minor: i64,
}

/// A freshly created authorization, ready for client-side capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAuthorization {
    /// Processor reference; the idempotency key for the booking flow.
    pub reference: PaymentReference,

    /// Secret handed to the payment-capture UI to complete the charge.
    pub client_secret: String,

    /// Amount the processor will charge, in the smallest currency unit.
    pub amount_minor: i64,
}

/// Current state of an authorization, as reported by the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    pub reference: PaymentReference,
    pub status: PaymentStatus,
    /// Amount actually charged, in the smallest currency unit.
    pub amount_minor: i64,
    /// Booking facts bound at creation time.
    pub binding: AuthorizationBinding,
}

/// The booking this authorization was created for, fixed at creation.
///
/// The orchestrator cross-checks these against the confirmation request;
/// any mismatch is treated as potential tampering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationBinding {
    pub show_id: ShowId,
    pub seats: SeatSet,
    pub user_id: UserId,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create an unknown-reference error.
    pub fn unknown_reference(reference: impl Into<String>) -> Self {
        Self::new(
            GatewayErrorCode::UnknownReference,
            format!("Unknown payment reference: {}", reference.into()),
        )
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }

    /// Create an invalid-response error (unparseable processor payload).
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// The processor does not know this reference.
    UnknownReference,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Processor rejected the request.
    ProviderError,

    /// Processor response could not be interpreted.
    InvalidResponse,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError | GatewayErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::UnknownReference => "unknown_reference",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}
