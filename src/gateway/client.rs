//! Gateway client
//!
//! reqwest-based client for the storage REST gateway.

use reqwest::header::{ACCEPT, LOCATION};
use reqwest::{Response, StatusCode, Url};

use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::protocol::{
    check_row_key, decode_row, encode_cell_set, CellSet, ScannerSpec, TableSchema, UserRecord,
};

const JSON: &str = "application/json";
const SCANNER_SEGMENT: &str = "scanner";

/// Reference to a scanner opened on the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerHandle {
    /// Table the scanner iterates
    pub table: String,

    /// Opaque cursor id assigned by the gateway
    pub id: String,
}

/// Client for single-row and scanner calls against the gateway
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base: Url,
    family: String,
}

impl GatewayClient {
    /// Build a client from config
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base: config.gateway_base()?,
            family: config.column_family.clone(),
        })
    }

    /// Column family this client reads and writes
    pub fn column_family(&self) -> &str {
        &self.family
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Create `table` with this client's column family
    ///
    /// Not idempotent: whatever the gateway answers for an existing table is
    /// passed through.
    pub async fn create_table(&self, table: &str) -> Result<()> {
        let url = self.url(&[table, "schema"])?;
        tracing::debug!("Creating table {} with family {}", table, self.family);

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, JSON)
            .json(&TableSchema::single_family(table, &self.family))
            .send()
            .await?;

        expect_success(resp, "create table").await?;
        Ok(())
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Write a record, creating or overwriting its row
    pub async fn put_row(&self, table: &str, record: &UserRecord) -> Result<()> {
        let url = self.row_url(table, &record.id)?;
        let body = encode_cell_set(record, &self.family)?;
        tracing::debug!("PUT row {} in {}", record.id, table);

        let resp = self
            .http
            .put(url)
            .header(ACCEPT, JSON)
            .json(&body)
            .send()
            .await?;

        expect_success(resp, "put row").await?;
        Ok(())
    }

    /// Look up a single row
    ///
    /// Fails with `NotFound` if the gateway has no row for `id`.
    pub async fn get_row(&self, table: &str, id: &str) -> Result<UserRecord> {
        let url = self.row_url(table, id)?;
        tracing::debug!("GET row {} from {}", id, table);

        let resp = self.http.get(url).header(ACCEPT, JSON).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(BridgeError::NotFound(id.to_string()));
        }

        let resp = expect_success(resp, "get row").await?;
        let set: CellSet = parse_json(resp).await?;

        let row = set
            .rows
            .first()
            .ok_or_else(|| BridgeError::NotFound(id.to_string()))?;
        decode_row(row, &self.family)
    }

    /// Delete a row
    ///
    /// Absence of the row is only an error if the gateway reports one.
    pub async fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        let url = self.row_url(table, id)?;
        tracing::debug!("DELETE row {} from {}", id, table);

        let resp = self.http.delete(url).header(ACCEPT, JSON).send().await?;
        expect_success(resp, "delete row").await?;
        Ok(())
    }

    // =========================================================================
    // Scanners
    // =========================================================================

    /// Open a scanner over `table` returning up to `batch` cells per read
    pub async fn open_scanner(&self, table: &str, batch: u32) -> Result<ScannerHandle> {
        let url = self.url(&[table, SCANNER_SEGMENT])?;

        let resp = self
            .http
            .put(url)
            .header(ACCEPT, JSON)
            .json(&ScannerSpec { batch })
            .send()
            .await?;
        let resp = expect_success(resp, "open scanner").await?;

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| BridgeError::gateway(None, "scanner response has no Location header"))?;

        let id = scanner_id_from_location(location).ok_or_else(|| {
            BridgeError::gateway(None, format!("cannot read scanner id from '{}'", location))
        })?;

        tracing::debug!("Opened scanner {} on {} (batch {})", id, table, batch);
        Ok(ScannerHandle {
            table: table.to_string(),
            id,
        })
    }

    /// Read the next batch from a scanner
    ///
    /// Returns `None` once the scanner is exhausted.
    pub async fn read_scanner(&self, handle: &ScannerHandle) -> Result<Option<CellSet>> {
        let url = self.url(&[&handle.table, SCANNER_SEGMENT, &handle.id])?;

        let resp = self.http.get(url).header(ACCEPT, JSON).send().await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let resp = expect_success(resp, "read scanner").await?;
        let set: CellSet = parse_json(resp).await?;

        tracing::trace!("Scanner {} returned {} rows", handle.id, set.rows.len());
        Ok((!set.rows.is_empty()).then_some(set))
    }

    /// Release a scanner on the gateway
    pub async fn close_scanner(&self, handle: &ScannerHandle) -> Result<()> {
        let url = self.url(&[&handle.table, SCANNER_SEGMENT, &handle.id])?;

        let resp = self.http.delete(url).header(ACCEPT, JSON).send().await?;
        expect_success(resp, "close scanner").await?;

        tracing::debug!("Closed scanner {}", handle.id);
        Ok(())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Cluster version reported by the gateway
    pub async fn version(&self) -> Result<String> {
        let url = self.url(&["version", "cluster"])?;

        let resp = self.http.get(url).header(ACCEPT, JSON).send().await?;
        let resp = expect_success(resp, "version").await?;

        let body = resp.text().await?;
        Ok(body.trim().trim_matches('"').to_string())
    }

    /// URL of a single row; ids that would resolve to another endpoint are
    /// rejected before any request is made
    fn row_url(&self, table: &str, id: &str) -> Result<Url> {
        check_row_key(id)?;
        self.url(&[table, id])
    }

    /// Build a gateway URL, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BridgeError::Config(format!("gateway url '{}' cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Pass successful responses through, turn anything else into a gateway error
async fn expect_success(resp: Response, operation: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| format!("unreadable response body: {}", e));
    let reason = status.canonical_reason().unwrap_or("unexpected status");

    Err(BridgeError::gateway(
        Some(status.as_u16()),
        format!("{} failed: {} {}", operation, reason, body.trim()).trim_end().to_string(),
    ))
}

async fn parse_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| BridgeError::gateway(None, format!("malformed gateway response: {}", e)))
}

/// The scanner id is the last path segment of the Location header
pub fn scanner_id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && !id.contains(':'))
        .map(str::to_string)
}
