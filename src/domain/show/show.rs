//! Show entity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{ShowId, Timestamp, ValidationError};

use super::SeatSet;

/// One scheduled screening with a fixed seat capacity.
///
/// The booked-seat set is the single piece of contended mutable state in the
/// system. It is mutated exclusively through the show inventory port's
/// `reserve_seats` (grows) and `release_seats` (compensation only); this type
/// itself is passed around as an immutable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub title: String,
    pub starts_at: Timestamp,
    /// Ticket price in the smallest currency unit.
    pub ticket_price_minor: i64,
    pub total_seats: u32,
    pub booked_seats: BTreeSet<u32>,
}

impl Show {
    /// Creates a show with no booked seats.
    pub fn new(
        id: ShowId,
        title: impl Into<String>,
        starts_at: Timestamp,
        ticket_price_minor: i64,
        total_seats: u32,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if ticket_price_minor < 0 {
            return Err(ValidationError::out_of_range(
                "ticket_price_minor",
                0,
                i64::MAX,
                ticket_price_minor,
            ));
        }
        if total_seats == 0 {
            return Err(ValidationError::out_of_range("total_seats", 1, i64::from(u32::MAX), 0));
        }

        Ok(Self {
            id,
            title,
            starts_at,
            ticket_price_minor,
            total_seats,
            booked_seats: BTreeSet::new(),
        })
    }

    /// Reconstructs a show with an existing booked-seat set (storage reads).
    ///
    /// Enforces the capacity invariant: every booked seat within
    /// `1..=total_seats`, and never more booked seats than capacity.
    pub fn with_booked_seats(
        mut self,
        booked_seats: BTreeSet<u32>,
    ) -> Result<Self, ValidationError> {
        if booked_seats.len() > self.total_seats as usize {
            return Err(ValidationError::out_of_range(
                "booked_seats",
                0,
                i64::from(self.total_seats),
                booked_seats.len() as i64,
            ));
        }
        if let Some(&seat) = booked_seats
            .iter()
            .find(|&&s| s == 0 || s > self.total_seats)
        {
            return Err(ValidationError::out_of_range(
                "booked_seats",
                1,
                i64::from(self.total_seats),
                i64::from(seat),
            ));
        }
        self.booked_seats = booked_seats;
        Ok(self)
    }

    /// Number of seats still available.
    pub fn seats_remaining(&self) -> u32 {
        self.total_seats - self.booked_seats.len() as u32
    }

    /// Requested seats that are already booked, ascending.
    pub fn taken_from(&self, seats: &SeatSet) -> Vec<u32> {
        seats.intersection_with(&self.booked_seats)
    }

    /// Whether every requested seat exists on this show.
    pub fn seats_in_range(&self, seats: &SeatSet) -> bool {
        seats.fits_within(self.total_seats)
    }

    /// Total price for the given seats, in the smallest currency unit.
    pub fn price_for(&self, seats: &SeatSet) -> i64 {
        self.ticket_price_minor * seats.len() as i64
    }
}
