//! # HTTP Request Handlers
//!
//! Thin transport layer: each handler deserializes the request, calls
//! into the ceremony engine or the stores, and serializes the result.
//! No ceremony logic lives here.
//!
//! ## Submodules
//! - `health`: liveness endpoint
//! - `users`: enrollment
//! - `auth`: the four ceremony endpoints (register/authenticate × start/finish)

pub mod auth;
pub mod health;
pub mod users;
