//! PostgreSQL adapters.
//!
//! Production implementations of the storage ports, using sqlx with
//! connection pooling.

mod booking_ledger;
mod show_inventory;

pub use booking_ledger::PostgresBookingLedger;
pub use show_inventory::PostgresShowInventory;
