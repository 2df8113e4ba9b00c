//! Scanner drain
//!
//! Reads a table end to end through a gateway scanner and pages the result.

use crate::config::Config;
use crate::error::Result;
use crate::gateway::{GatewayClient, ScannerHandle};
use crate::protocol::{decode_cell_set, UserRecord};
use super::{Page, PageRequest};

/// Offset/limit listing over a forward-only gateway scanner
///
/// Every call opens its own scanner; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct ScanPager {
    client: GatewayClient,
    table: String,
    batch_size: u32,
}

impl ScanPager {
    /// Create a pager for the configured table
    pub fn new(client: GatewayClient, config: &Config) -> Self {
        Self {
            client,
            table: config.table_name.clone(),
            batch_size: config.scan_batch_size,
        }
    }

    /// Drain the whole table and return the requested page
    pub async fn page(&self, request: PageRequest) -> Result<Page> {
        let records = self.fetch_all().await?;
        let page = request.slice(records);

        tracing::debug!(
            "Page {} (limit {}) holds {} of {} rows",
            request.page,
            request.limit,
            page.users.len(),
            page.total
        );
        Ok(page)
    }

    /// Read every row of the table, in gateway order
    ///
    /// The scanner is released on every exit path. A decoding failure in any
    /// batch fails the whole drain.
    pub async fn fetch_all(&self) -> Result<Vec<UserRecord>> {
        let handle = self.client.open_scanner(&self.table, self.batch_size).await?;
        let guard = ScannerGuard::new(self.client.clone(), handle);

        let drained = self.drain(guard.handle()).await;
        guard.release().await;

        drained
    }

    async fn drain(&self, handle: &ScannerHandle) -> Result<Vec<UserRecord>> {
        let mut records: Vec<UserRecord> = Vec::new();
        let mut batches = 0usize;

        while let Some(set) = self.client.read_scanner(handle).await? {
            batches += 1;
            for record in decode_cell_set(&set, self.client.column_family())? {
                // A row wider than the batch arrives split over consecutive reads
                match records.last_mut() {
                    Some(last) if last.id == record.id => merge_into(last, record),
                    _ => records.push(record),
                }
            }
        }

        tracing::debug!(
            "Drained {} rows from {} in {} batches",
            records.len(),
            self.table,
            batches
        );
        Ok(records)
    }
}

fn merge_into(target: &mut UserRecord, part: UserRecord) {
    if part.name.is_some() {
        target.name = part.name;
    }
    if part.email.is_some() {
        target.email = part.email;
    }
    if part.age.is_some() {
        target.age = part.age;
    }
}

/// Owns an open scanner until it is released
///
/// `release` closes it explicitly. If the guard is dropped first (the request
/// future was cancelled), the close is spawned on the current runtime.
struct ScannerGuard {
    client: GatewayClient,
    handle: ScannerHandle,
    armed: bool,
}

impl ScannerGuard {
    fn new(client: GatewayClient, handle: ScannerHandle) -> Self {
        Self {
            client,
            handle,
            armed: true,
        }
    }

    fn handle(&self) -> &ScannerHandle {
        &self.handle
    }

    async fn release(mut self) {
        self.armed = false;
        close_quietly(&self.client, &self.handle).await;
    }
}

impl Drop for ScannerGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let client = self.client.clone();
                let handle = self.handle.clone();
                runtime.spawn(async move {
                    close_quietly(&client, &handle).await;
                });
            }
            Err(_) => {
                tracing::warn!("Scanner {} abandoned outside a runtime", self.handle.id);
            }
        }
    }
}

async fn close_quietly(client: &GatewayClient, handle: &ScannerHandle) {
    if let Err(e) = client.close_scanner(handle).await {
        tracing::warn!("Failed to release scanner {}: {}", handle.id, e);
    }
}
