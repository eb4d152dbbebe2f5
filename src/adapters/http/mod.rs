//! HTTP adapters - axum routes, handlers, DTOs, and middleware.

pub mod booking;
pub mod middleware;
