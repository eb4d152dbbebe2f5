//! Marquee - Movie Ticket Booking Backend
//!
//! This crate implements catalog-backed seat booking with payment-verified,
//! atomic seat reservation against concurrent booking attempts.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
