//! Wire types for the Stripe PaymentIntents API.

use serde::Deserialize;
use std::collections::HashMap;

/// A PaymentIntent as returned by the Stripe API.
///
/// Only the fields the gateway adapter reads; everything else in the
/// response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,

    /// Stripe lifecycle status string, e.g. "succeeded" or "processing".
    pub status: String,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Present on creation; handed to the payment-capture UI.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Metadata bound at creation time.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Stripe error envelope: `{"error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeApiError,
}

/// The error object inside a Stripe error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
