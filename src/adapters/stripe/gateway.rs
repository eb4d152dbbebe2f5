//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Stripe PaymentIntents
//! API. Charge amounts and the booking binding (show, seats, user) are fixed
//! into PaymentIntent metadata at creation, so verification at confirmation
//! time never trusts client-supplied values.
//!
//! # Security
//!
//! - Secret API key handled via `secrecy::SecretString`
//! - Amounts are computed server-side before reaching this adapter

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::PaymentConfig;
use crate::domain::booking::PaymentStatus;
use crate::domain::foundation::{PaymentReference, ShowId, UserId};
use crate::domain::show::SeatSet;
use crate::ports::{
    AuthorizationBinding, CreateAuthorizationRequest, CreatedAuthorization, GatewayError,
    PaymentAuthorization, PaymentGateway,
};

use super::types::{StripeErrorEnvelope, StripePaymentIntent};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeGatewayConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Charge currency, lowercase ISO 4217.
    currency: String,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeGatewayConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            currency: currency.into(),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl From<&PaymentConfig> for StripeGatewayConfig {
    fn from(config: &PaymentConfig) -> Self {
        Self {
            api_key: SecretString::new(config.stripe_api_key.clone()),
            currency: config.currency.clone(),
            api_base_url: config.api_base_url.clone(),
        }
    }
}

/// Stripe payment gateway adapter.
pub struct StripePaymentGateway {
    config: StripeGatewayConfig,
    http_client: reqwest::Client,
}

impl StripePaymentGateway {
    /// Create a new Stripe gateway with the given configuration.
    pub fn new(config: StripeGatewayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn read_error(&self, response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => {
                tracing::error!("Stripe rejected API credentials");
                GatewayError::new(
                    crate::ports::GatewayErrorCode::AuthenticationError,
                    message,
                )
            }
            404 => GatewayError::unknown_reference(message),
            429 => GatewayError::new(crate::ports::GatewayErrorCode::RateLimitExceeded, message),
            _ => {
                tracing::error!(status = status.as_u16(), error = %message, "Stripe API error");
                GatewayError::provider(format!("Stripe API error: {}", message))
            }
        }
    }

    fn to_authorization(
        &self,
        intent: StripePaymentIntent,
    ) -> Result<PaymentAuthorization, GatewayError> {
        let binding = binding_from_metadata(&intent.metadata)
            .map_err(GatewayError::invalid_response)?;

        Ok(PaymentAuthorization {
            reference: PaymentReference::new(intent.id)
                .map_err(|e| GatewayError::invalid_response(e.to_string()))?,
            status: map_intent_status(&intent.status),
            amount_minor: intent.amount,
            binding,
        })
    }
}

/// Maps a Stripe PaymentIntent status string to the domain status.
///
/// Everything still in flight maps to `Pending`; only the terminal success
/// state permits a booking, so unknown future statuses are safe as pending.
fn map_intent_status(status: &str) -> PaymentStatus {
    match status {
        "succeeded" => PaymentStatus::Succeeded,
        "canceled" => PaymentStatus::Failed,
        _ => PaymentStatus::Pending,
    }
}

/// Comma-joined ascending seat numbers for PaymentIntent metadata.
fn seats_to_metadata(seats: &SeatSet) -> String {
    seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn binding_from_metadata(
    metadata: &std::collections::HashMap<String, String>,
) -> Result<AuthorizationBinding, String> {
    let show_id: ShowId = metadata
        .get("show_id")
        .ok_or("Missing show_id in payment metadata")?
        .parse()
        .map_err(|e| format!("Invalid show_id in payment metadata: {}", e))?;

    let seats_raw = metadata
        .get("seats")
        .ok_or("Missing seats in payment metadata")?;
    let seat_numbers: Vec<u32> = seats_raw
        .split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid seats in payment metadata: {}", e))?;
    let seats = SeatSet::new(seat_numbers)
        .map_err(|e| format!("Invalid seats in payment metadata: {}", e))?;

    let user_id = UserId::new(
        metadata
            .get("user_id")
            .ok_or("Missing user_id in payment metadata")?
            .clone(),
    )
    .map_err(|e| format!("Invalid user_id in payment metadata: {}", e))?;

    Ok(AuthorizationBinding {
        show_id,
        seats,
        user_id,
    })
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn create_authorization(
        &self,
        request: CreateAuthorizationRequest,
    ) -> Result<CreatedAuthorization, GatewayError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let params = vec![
            ("amount", request.amount_minor.to_string()),
            ("currency", self.config.currency.clone()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("metadata[show_id]", request.show_id.to_string()),
            ("metadata[seats]", seats_to_metadata(&request.seats)),
            ("metadata[user_id]", request.user_id.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.read_error(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            GatewayError::invalid_response(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            GatewayError::invalid_response("PaymentIntent response missing client_secret")
        })?;

        tracing::info!(
            reference = %intent.id,
            amount_minor = intent.amount,
            "Payment authorization created"
        );

        Ok(CreatedAuthorization {
            reference: PaymentReference::new(intent.id)
                .map_err(|e| GatewayError::invalid_response(e.to_string()))?,
            client_secret,
            amount_minor: intent.amount,
        })
    }

    async fn retrieve_authorization(
        &self,
        reference: &PaymentReference,
    ) -> Result<PaymentAuthorization, GatewayError> {
        let url = format!(
            "{}/v1/payment_intents/{}",
            self.config.api_base_url,
            reference.as_str()
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::unknown_reference(reference.as_str()));
        }

        if !response.status().is_success() {
            return Err(self.read_error(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            GatewayError::invalid_response(format!("Failed to parse Stripe response: {}", e))
        })?;

        self.to_authorization(intent)
    }
}
