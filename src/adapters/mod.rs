//! Adapters - Implementations of ports against real infrastructure.
//!
//! - `auth` - session-token validation
//! - `email` - receipt notifications
//! - `http` - axum routes and middleware
//! - `memory` - in-memory storage for tests and local development
//! - `postgres` - production storage
//! - `stripe` - payment gateway

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
