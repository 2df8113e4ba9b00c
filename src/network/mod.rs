//! Network Module
//!
//! HTTP surface of the user API.
//!
//! ## Architecture
//! - axum router, one handler per operation
//! - Handlers share an `Arc<Engine>`; no other state
//! - Errors map to status codes: NotFound -> 404, InvalidArgument -> 400,
//!   anything else -> 500

pub mod handlers;
mod server;

pub use server::{router, Server};
