//! Show inventory port - atomic seat reservation.
//!
//! This is the linchpin correctness contract of the whole system: the
//! check-and-write in `reserve_seats` is the only place where the "first
//! writer wins" rule for a seat is enforced, and it must hold under
//! arbitrary concurrent invocation.

use async_trait::async_trait;

use crate::domain::foundation::ShowId;
use crate::domain::show::{SeatSet, Show};

/// Port for show seat inventory.
#[async_trait]
pub trait ShowInventory: Send + Sync {
    /// Fetch a show by id.
    async fn find(&self, show_id: &ShowId) -> Result<Option<Show>, InventoryError>;

    /// Atomically reserve seats on a show.
    ///
    /// # Contract
    ///
    /// Succeeds and returns the updated show only if none of the requested
    /// seats are present in the show's booked-seat set at the moment of the
    /// check-and-write. The check and the write are a single indivisible
    /// operation with respect to all concurrent callers: no caller may
    /// observe or act on a stale booked-seat set between check and write.
    ///
    /// On failure the operation makes no change; it never partially reserves
    /// a subset of the requested seats.
    async fn reserve_seats(&self, show_id: &ShowId, seats: &SeatSet)
        -> Result<Show, InventoryError>;

    /// Remove seats from a show's booked-seat set.
    ///
    /// Compensation for a failed booking insert only; never part of a
    /// user-facing cancellation flow.
    async fn release_seats(&self, show_id: &ShowId, seats: &SeatSet)
        -> Result<(), InventoryError>;
}

/// Errors from show inventory operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The show does not exist.
    ShowNotFound(ShowId),

    /// At least one requested seat is already booked. Nothing was reserved.
    SeatConflict { taken: Vec<u32> },

    /// A requested seat number exceeds the show's capacity.
    SeatOutOfRange { seat: u32, total_seats: u32 },

    /// Storage failure.
    Storage(String),
}

impl InventoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        InventoryError::Storage(message.into())
    }
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::ShowNotFound(show_id) => write!(f, "Show not found: {}", show_id),
            InventoryError::SeatConflict { taken } => {
                let seats: Vec<String> = taken.iter().map(u32::to_string).collect();
                write!(f, "Seats already booked: {}", seats.join(", "))
            }
            InventoryError::SeatOutOfRange { seat, total_seats } => {
                write!(f, "Seat {} exceeds show capacity of {}", seat, total_seats)
            }
            InventoryError::Storage(msg) => write!(f, "Inventory storage error: {}", msg),
        }
    }
}

impl std::error::Error for InventoryError {}
