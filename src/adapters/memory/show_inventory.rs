//! In-memory implementation of ShowInventory.
//!
//! The reference model for the reservation contract: check and write happen
//! under one mutex guard, so they are indivisible with respect to all
//! concurrent callers. Used by tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::ShowId;
use crate::domain::show::{SeatSet, Show};
use crate::ports::{InventoryError, ShowInventory};

/// In-memory `ShowInventory` implementation.
pub struct InMemoryShowInventory {
    shows: Mutex<HashMap<ShowId, Show>>,
}

impl InMemoryShowInventory {
    pub fn new() -> Self {
        Self {
            shows: Mutex::new(HashMap::new()),
        }
    }

    /// Add or replace a show (show CRUD is outside the booking core).
    pub fn insert(&self, show: Show) {
        self.shows.lock().unwrap().insert(show.id, show);
    }
}

impl Default for InMemoryShowInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShowInventory for InMemoryShowInventory {
    async fn find(&self, show_id: &ShowId) -> Result<Option<Show>, InventoryError> {
        Ok(self.shows.lock().unwrap().get(show_id).cloned())
    }

    async fn reserve_seats(
        &self,
        show_id: &ShowId,
        seats: &SeatSet,
    ) -> Result<Show, InventoryError> {
        // One guard spans check and write; no interleaving is possible.
        let mut shows = self.shows.lock().unwrap();
        let show = shows
            .get_mut(show_id)
            .ok_or(InventoryError::ShowNotFound(*show_id))?;

        if !show.seats_in_range(seats) {
            return Err(InventoryError::SeatOutOfRange {
                seat: seats.max_seat(),
                total_seats: show.total_seats,
            });
        }

        let taken = show.taken_from(seats);
        if !taken.is_empty() {
            return Err(InventoryError::SeatConflict { taken });
        }

        show.booked_seats.extend(seats.iter());
        Ok(show.clone())
    }

    async fn release_seats(
        &self,
        show_id: &ShowId,
        seats: &SeatSet,
    ) -> Result<(), InventoryError> {
        let mut shows = self.shows.lock().unwrap();
        let show = shows
            .get_mut(show_id)
            .ok_or(InventoryError::ShowNotFound(*show_id))?;

        for seat in seats.iter() {
            show.booked_seats.remove(&seat);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use proptest::prelude::*;

    fn test_show(show_id: ShowId, total_seats: u32) -> Show {
        Show::new(show_id, "Evening Screening", Timestamp::now(), 200, total_seats).unwrap()
    }

    #[tokio::test]
    async fn reserve_marks_seats_booked() {
        let show_id = ShowId::new();
        let inventory = InMemoryShowInventory::new();
        inventory.insert(test_show(show_id, 50));

        let updated = inventory
            .reserve_seats(&show_id, &SeatSet::new([10, 11]).unwrap())
            .await
            .unwrap();

        assert!(updated.booked_seats.contains(&10));
        assert!(updated.booked_seats.contains(&11));
    }

    #[tokio::test]
    async fn overlapping_reservation_conflicts_and_changes_nothing() {
        let show_id = ShowId::new();
        let inventory = InMemoryShowInventory::new();
        inventory.insert(test_show(show_id, 50));

        inventory
            .reserve_seats(&show_id, &SeatSet::new([10, 11]).unwrap())
            .await
            .unwrap();

        let result = inventory
            .reserve_seats(&show_id, &SeatSet::new([11, 12]).unwrap())
            .await;

        match result {
            Err(InventoryError::SeatConflict { taken }) => assert_eq!(taken, vec![11]),
            other => panic!("Expected SeatConflict, got {:?}", other),
        }

        // Seat 12 was not partially reserved.
        let show = inventory.find(&show_id).await.unwrap().unwrap();
        assert!(!show.booked_seats.contains(&12));
    }

    #[tokio::test]
    async fn reserve_rejects_out_of_range_seat() {
        let show_id = ShowId::new();
        let inventory = InMemoryShowInventory::new();
        inventory.insert(test_show(show_id, 50));

        let result = inventory
            .reserve_seats(&show_id, &SeatSet::new([51]).unwrap())
            .await;

        assert!(matches!(
            result,
            Err(InventoryError::SeatOutOfRange {
                seat: 51,
                total_seats: 50
            })
        ));
    }

    #[tokio::test]
    async fn reserve_rejects_unknown_show() {
        let inventory = InMemoryShowInventory::new();
        let result = inventory
            .reserve_seats(&ShowId::new(), &SeatSet::new([1]).unwrap())
            .await;
        assert!(matches!(result, Err(InventoryError::ShowNotFound(_))));
    }

    #[tokio::test]
    async fn release_returns_seats_to_pool() {
        let show_id = ShowId::new();
        let inventory = InMemoryShowInventory::new();
        inventory.insert(test_show(show_id, 50));

        let seats = SeatSet::new([10, 11]).unwrap();
        inventory.reserve_seats(&show_id, &seats).await.unwrap();
        inventory.release_seats(&show_id, &seats).await.unwrap();

        // Released seats are reservable again.
        let result = inventory.reserve_seats(&show_id, &seats).await;
        assert!(result.is_ok());
    }

    proptest! {
        /// Reservation is all-or-nothing: a second request either succeeds
        /// exactly when it is disjoint from the first, or leaves the booked
        /// set untouched.
        #[test]
        fn reservation_is_all_or_nothing(
            first in proptest::collection::btree_set(1u32..=30, 1..=5),
            second in proptest::collection::btree_set(1u32..=30, 1..=5),
        ) {
            let first_seats = SeatSet::new(first.clone()).unwrap();
            let second_seats = SeatSet::new(second.clone()).unwrap();

            let show_id = ShowId::new();
            let inventory = InMemoryShowInventory::new();
            inventory.insert(test_show(show_id, 30));

            futures::executor::block_on(async {
                inventory.reserve_seats(&show_id, &first_seats).await.unwrap();

                let result = inventory.reserve_seats(&show_id, &second_seats).await;
                let booked = inventory
                    .find(&show_id)
                    .await
                    .unwrap()
                    .unwrap()
                    .booked_seats;

                if first.is_disjoint(&second) {
                    prop_assert!(result.is_ok());
                    let expected: std::collections::BTreeSet<u32> =
                        first.union(&second).copied().collect();
                    prop_assert_eq!(booked, expected);
                } else {
                    let is_conflict = matches!(result, Err(InventoryError::SeatConflict { .. }));
                    prop_assert!(is_conflict);
                    prop_assert_eq!(booked, first);
                }
                Ok(())
            })?;
        }
    }
}
