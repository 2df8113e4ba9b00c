//! Gateway Module
//!
//! HTTP client for the storage engine's REST gateway.
//!
//! ## Endpoints Used
//! - `POST   /{table}/schema`            - create table + column family
//! - `PUT    /{table}/{rowkey}`          - upsert one row
//! - `GET    /{table}/{rowkey}`          - point lookup (404 when absent)
//! - `DELETE /{table}/{rowkey}`          - delete one row
//! - `PUT    /{table}/scanner`           - open a scanner (id in `Location`)
//! - `GET    /{table}/scanner/{id}`      - next batch (204 when exhausted)
//! - `DELETE /{table}/scanner/{id}`      - release a scanner

mod client;

pub use client::{scanner_id_from_location, GatewayClient, ScannerHandle};
