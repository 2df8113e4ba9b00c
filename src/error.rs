//! Error types for CellBridge
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type for CellBridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Row not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Gateway Errors
    // -------------------------------------------------------------------------
    #[error("Gateway error{}: {}", .status.map(|s| format!(" (status {})", s)).unwrap_or_default(), .message)]
    Gateway {
        status: Option<u16>,
        message: String,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Build a gateway error for an unexpected response status
    pub fn gateway(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Gateway {
            status,
            message: message.into(),
        }
    }

    /// Transport status code a handler should answer with
    ///
    /// - `NotFound` -> 404
    /// - `InvalidArgument` -> 400
    /// - everything else -> 500
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::NotFound(_) => 404,
            BridgeError::InvalidArgument(_) => 400,
            _ => 500,
        }
    }
}
