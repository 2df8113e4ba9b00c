//! # CellBridge
//!
//! A REST bridge exposing flat user records on top of a column-family store:
//! - Flat record <-> row/cell mapping with base64 wire encoding
//! - Single-row put/get/delete through the store's REST gateway
//! - Offset/limit listing emulated over forward-only scanners
//! - axum HTTP surface with status mapping per error kind
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HTTP Server (axum)                       │
//! │              /init  /users  /users/{id}                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                                │
//! │              (one best-effort pass per request)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Gateway   │◄─────────│  ScanPager  │
//!   │  (row ops)  │          │ (scanners)  │
//!   └──────┬──────┘          └─────────────┘
//!          │  Codec (base64 CellSet)
//!          ▼
//!   ┌─────────────┐
//!   │ REST gateway│
//!   │  (remote)   │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod gateway;
pub mod scan;
pub mod engine;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BridgeError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of CellBridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
