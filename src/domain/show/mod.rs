//! Show domain module.
//!
//! A show is one scheduled screening: a seat capacity, a ticket price, and
//! the set of seats already booked.

mod seats;
mod show;

pub use seats::SeatSet;
pub use show::Show;
