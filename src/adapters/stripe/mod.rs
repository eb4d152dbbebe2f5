//! Stripe payment gateway adapters.
//!
//! - `StripePaymentGateway` - production adapter over the PaymentIntents API
//! - `MockPaymentGateway` - in-memory adapter for development and testing

mod gateway;
mod mock_gateway;
mod types;

pub use gateway::{StripeGatewayConfig, StripePaymentGateway};
pub use mock_gateway::MockPaymentGateway;
