//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Booking Core Ports
//!
//! - `PaymentGateway` - External payment processor (authorization create/retrieve)
//! - `ShowInventory` - Atomic seat reservation on shows
//! - `BookingLedger` - Durable booking records, unique per payment reference
//! - `BookingNotifier` - Best-effort post-commit notifications
//!
//! ## Ambient Ports
//!
//! - `SessionValidator` - Session-token validation for the HTTP layer

mod booking_ledger;
mod notifier;
mod payment_gateway;
mod session_validator;
mod show_inventory;

pub use booking_ledger::{BookingLedger, LedgerError};
pub use notifier::{BookingNotifier, NotifyError};
pub use payment_gateway::{
    AuthorizationBinding, CreateAuthorizationRequest, CreatedAuthorization, GatewayError,
    GatewayErrorCode, PaymentAuthorization, PaymentGateway,
};
pub use session_validator::SessionValidator;
pub use show_inventory::{InventoryError, ShowInventory};
