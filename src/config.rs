//! Configuration for CellBridge
//!
//! Centralized configuration with sensible defaults. The config is handed to
//! each component at construction; nothing reads process-wide constants.

use std::time::Duration;

use reqwest::Url;

use crate::error::{BridgeError, Result};

/// Main configuration for a CellBridge instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Gateway Configuration
    // -------------------------------------------------------------------------
    /// Base URL of the storage REST gateway
    pub gateway_url: String,

    /// Table holding the user rows
    pub table_name: String,

    /// Column family every user field lives under
    pub column_family: String,

    /// Rows requested per scanner batch (independent of the page size)
    pub scan_batch_size: u32,

    /// Per-call gateway timeout (milliseconds, 0 = transport default)
    pub request_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:8080".to_string(),
            table_name: "users".to_string(),
            column_family: "info".to_string(),
            scan_batch_size: 100,
            request_timeout_ms: 0,
            listen_addr: "127.0.0.1:7070".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can drive a gateway client
    pub fn validate(&self) -> Result<()> {
        self.gateway_base()?;

        if self.table_name.is_empty() {
            return Err(BridgeError::Config("table name must not be empty".to_string()));
        }
        if self.column_family.is_empty() {
            return Err(BridgeError::Config("column family must not be empty".to_string()));
        }
        if self.column_family.contains(':') {
            return Err(BridgeError::Config(format!(
                "column family '{}' must not contain ':'",
                self.column_family
            )));
        }
        if self.scan_batch_size == 0 {
            return Err(BridgeError::Config("scan batch size must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Parsed gateway base URL
    pub fn gateway_base(&self) -> Result<Url> {
        let url = Url::parse(&self.gateway_url).map_err(|e| {
            BridgeError::Config(format!("invalid gateway url '{}': {}", self.gateway_url, e))
        })?;

        if url.cannot_be_a_base() {
            return Err(BridgeError::Config(format!(
                "gateway url '{}' cannot be used as a base",
                self.gateway_url
            )));
        }

        Ok(url)
    }

    /// Gateway timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the gateway base URL
    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.config.gateway_url = url.into();
        self
    }

    /// Set the table name
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.config.table_name = name.into();
        self
    }

    /// Set the column family
    pub fn column_family(mut self, family: impl Into<String>) -> Self {
        self.config.column_family = family.into();
        self
    }

    /// Set the scanner batch size
    pub fn scan_batch_size(mut self, size: u32) -> Self {
        self.config.scan_batch_size = size;
        self
    }

    /// Set the gateway timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
