//! Engine Module
//!
//! Coordinates the codec, gateway client and scan pager behind the user API.
//!
//! ## Responsibilities
//! - Validate config and build the gateway components
//! - Run each user operation as a single best-effort pass
//! - Surface every failure to the caller unchanged (no retries, no rollback)

use crate::config::Config;
use crate::error::Result;
use crate::gateway::GatewayClient;
use crate::protocol::{UserPayload, UserRecord};
use crate::scan::{Page, PageRequest, ScanPager};

/// The user operations engine
///
/// ## Concurrency Model
///
/// The engine holds no mutable state; it is shared behind an `Arc` and every
/// request runs as its own task. Concurrent writes to the same id are not
/// ordered: the last put the gateway completes wins.
#[derive(Debug, Clone)]
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Single-row gateway calls
    gateway: GatewayClient,

    /// Listing over gateway scanners
    pager: ScanPager,
}

impl Engine {
    /// Build an engine from config
    pub fn new(config: Config) -> Result<Self> {
        let gateway = GatewayClient::new(&config)?;
        let pager = ScanPager::new(gateway.clone(), &config);

        Ok(Self {
            config,
            gateway,
            pager,
        })
    }

    /// Create the users table with its column family
    pub async fn init(&self) -> Result<()> {
        self.gateway.create_table(&self.config.table_name).await?;
        tracing::info!("Created table {}", self.config.table_name);
        Ok(())
    }

    /// Store a new user, overwriting any row with the same id
    pub async fn create_user(&self, record: &UserRecord) -> Result<()> {
        self.gateway.put_row(&self.config.table_name, record).await?;
        tracing::info!("Stored user {}", record.id);
        Ok(())
    }

    /// Fetch one user
    pub async fn get_user(&self, id: &str) -> Result<UserRecord> {
        self.gateway.get_row(&self.config.table_name, id).await
    }

    /// Replace a user's fields
    ///
    /// An upsert keyed by `id`; any id in the payload is ignored.
    pub async fn update_user(&self, id: &str, fields: UserPayload) -> Result<UserRecord> {
        let record = fields.into_record_with_id(id)?;
        self.gateway.put_row(&self.config.table_name, &record).await?;
        tracing::info!("Updated user {}", id);
        Ok(record)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.gateway.delete_row(&self.config.table_name, id).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// List one page of users ordered by id
    pub async fn list_users(&self, request: PageRequest) -> Result<Page> {
        self.pager.page(request).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the gateway client
    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }
}
