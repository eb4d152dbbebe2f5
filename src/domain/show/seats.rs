//! Seat set value object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::ValidationError;

/// A validated, order-irrelevant set of seat numbers.
///
/// Invariants: non-empty, every seat number is at least 1, no duplicates.
/// Whether the seats actually exist on a given show is checked against that
/// show's capacity, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct SeatSet(BTreeSet<u32>);

impl SeatSet {
    /// Creates a seat set from seat numbers, deduplicating silently.
    pub fn new(seats: impl IntoIterator<Item = u32>) -> Result<Self, ValidationError> {
        let set: BTreeSet<u32> = seats.into_iter().collect();
        if set.is_empty() {
            return Err(ValidationError::empty_field("seats"));
        }
        if let Some(&seat) = set.iter().find(|&&s| s == 0) {
            return Err(ValidationError::out_of_range(
                "seats",
                1,
                i64::from(u32::MAX),
                i64::from(seat),
            ));
        }
        Ok(Self(set))
    }

    /// Number of seats in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A seat set is never empty by construction; provided for completeness.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the given seat number is in the set.
    pub fn contains(&self, seat: u32) -> bool {
        self.0.contains(&seat)
    }

    /// The highest seat number in the set.
    pub fn max_seat(&self) -> u32 {
        // Non-empty by construction.
        *self.0.iter().next_back().unwrap_or(&1)
    }

    /// Whether every seat falls within `1..=total_seats`.
    pub fn fits_within(&self, total_seats: u32) -> bool {
        self.max_seat() <= total_seats
    }

    /// Iterates seat numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Seats from this set that are present in `booked`.
    pub fn intersection_with(&self, booked: &BTreeSet<u32>) -> Vec<u32> {
        self.0.intersection(booked).copied().collect()
    }

    /// Seat numbers as an ascending vector.
    pub fn to_vec(&self) -> Vec<u32> {
        self.0.iter().copied().collect()
    }
}

impl TryFrom<Vec<u32>> for SeatSet {
    type Error = ValidationError;

    fn try_from(seats: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(seats)
    }
}

impl From<SeatSet> for Vec<u32> {
    fn from(seats: SeatSet) -> Self {
        seats.to_vec()
    }
}
