//! In-memory payment gateway for development and testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::domain::booking::PaymentStatus;
use crate::domain::foundation::PaymentReference;
use crate::ports::{
    AuthorizationBinding, CreateAuthorizationRequest, CreatedAuthorization, GatewayError,
    PaymentAuthorization, PaymentGateway,
};

/// In-memory `PaymentGateway` implementation.
///
/// Authorizations are created in the configured initial status (succeeded by
/// default, so local flows work without a capture step) and can be moved to
/// another status with [`MockPaymentGateway::settle`].
pub struct MockPaymentGateway {
    authorizations: Mutex<HashMap<String, PaymentAuthorization>>,
    initial_status: PaymentStatus,
    counter: AtomicU64,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            authorizations: Mutex::new(HashMap::new()),
            initial_status: PaymentStatus::Succeeded,
            counter: AtomicU64::new(1),
        }
    }

    /// Create authorizations in the given initial status instead of
    /// succeeded (e.g. `Pending` to exercise the capture flow).
    pub fn with_initial_status(mut self, status: PaymentStatus) -> Self {
        self.initial_status = status;
        self
    }

    /// Insert an authorization directly, bypassing `create_authorization`.
    pub fn seed(&self, authorization: PaymentAuthorization) {
        self.authorizations
            .lock()
            .unwrap()
            .insert(authorization.reference.as_str().to_string(), authorization);
    }

    /// Move an existing authorization to a new status.
    pub fn settle(&self, reference: &PaymentReference, status: PaymentStatus) {
        if let Some(authorization) = self
            .authorizations
            .lock()
            .unwrap()
            .get_mut(reference.as_str())
        {
            authorization.status = status;
        }
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_authorization(
        &self,
        request: CreateAuthorizationRequest,
    ) -> Result<CreatedAuthorization, GatewayError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let reference = PaymentReference::new(format!("pay_mock_{}", n))
            .map_err(|e| GatewayError::provider(e.to_string()))?;

        let authorization = PaymentAuthorization {
            reference: reference.clone(),
            status: self.initial_status,
            amount_minor: request.amount_minor,
            binding: AuthorizationBinding {
                show_id: request.show_id,
                seats: request.seats,
                user_id: request.user_id,
            },
        };
        self.seed(authorization);

        Ok(CreatedAuthorization {
            client_secret: format!("{}_secret", reference.as_str()),
            amount_minor: request.amount_minor,
            reference,
        })
    }

    async fn retrieve_authorization(
        &self,
        reference: &PaymentReference,
    ) -> Result<PaymentAuthorization, GatewayError> {
        self.authorizations
            .lock()
            .unwrap()
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| GatewayError::unknown_reference(reference.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ShowId, UserId};
    use crate::domain::show::SeatSet;

    fn test_request() -> CreateAuthorizationRequest {
        CreateAuthorizationRequest {
            show_id: ShowId::new(),
            seats: SeatSet::new([10, 11]).unwrap(),
            user_id: UserId::new("user-1").unwrap(),
            amount_minor: 400,
        }
    }

    #[tokio::test]
    async fn create_then_retrieve_roundtrips() {
        let gateway = MockPaymentGateway::new();
        let request = test_request();
        let show_id = request.show_id;

        let created = gateway.create_authorization(request).await.unwrap();
        let authorization = gateway
            .retrieve_authorization(&created.reference)
            .await
            .unwrap();

        assert_eq!(authorization.status, PaymentStatus::Succeeded);
        assert_eq!(authorization.amount_minor, 400);
        assert_eq!(authorization.binding.show_id, show_id);
    }

    #[tokio::test]
    async fn references_are_unique() {
        let gateway = MockPaymentGateway::new();
        let a = gateway.create_authorization(test_request()).await.unwrap();
        let b = gateway.create_authorization(test_request()).await.unwrap();
        assert_ne!(a.reference, b.reference);
    }

    #[tokio::test]
    async fn initial_status_is_configurable() {
        let gateway = MockPaymentGateway::new().with_initial_status(PaymentStatus::Pending);
        let created = gateway.create_authorization(test_request()).await.unwrap();

        let authorization = gateway
            .retrieve_authorization(&created.reference)
            .await
            .unwrap();
        assert_eq!(authorization.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn settle_moves_status() {
        let gateway = MockPaymentGateway::new().with_initial_status(PaymentStatus::Pending);
        let created = gateway.create_authorization(test_request()).await.unwrap();

        gateway.settle(&created.reference, PaymentStatus::Succeeded);

        let authorization = gateway
            .retrieve_authorization(&created.reference)
            .await
            .unwrap();
        assert!(authorization.status.is_succeeded());
    }

    #[tokio::test]
    async fn unknown_reference_is_an_error() {
        let gateway = MockPaymentGateway::new();
        let reference = PaymentReference::new("pay_unknown").unwrap();

        let result = gateway.retrieve_authorization(&reference).await;
        assert!(result.is_err());
    }
}
