//! Page requests
//!
//! Offset/limit arithmetic over a fully drained, id-ordered record list.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::protocol::UserRecord;

/// Page used when the caller gives none
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when the caller gives none
pub const DEFAULT_LIMIT: usize = 10;

/// Largest page size a caller may ask for
pub const MAX_PAGE_LIMIT: usize = 1000;

/// A validated, 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from already-typed values
    pub fn new(page: usize, limit: usize) -> Result<Self> {
        if page == 0 {
            return Err(BridgeError::InvalidArgument("page must be at least 1".to_string()));
        }
        if limit == 0 {
            return Err(BridgeError::InvalidArgument("limit must be at least 1".to_string()));
        }
        if limit > MAX_PAGE_LIMIT {
            return Err(BridgeError::InvalidArgument(format!(
                "limit must be at most {}",
                MAX_PAGE_LIMIT
            )));
        }
        Ok(Self { page, limit })
    }

    /// Parse raw query values, applying defaults for absent ones
    ///
    /// Zero, negative and non-numeric values fail with `InvalidArgument`.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = match page {
            Some(raw) => parse_positive("page", raw)?,
            None => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(raw) => parse_positive("limit", raw)?,
            None => DEFAULT_LIMIT,
        };
        Self::new(page, limit)
    }

    /// Index of the first record on this page
    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index one past the last record on this page
    pub fn end(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }

    /// Sort `records` by id and cut out this page
    ///
    /// `total` is the number of records handed in.
    pub fn slice(&self, mut records: Vec<UserRecord>) -> Page {
        records.sort_by(|a, b| a.id.as_bytes().cmp(b.id.as_bytes()));

        let total = records.len();
        let start = self.start().min(total);
        let end = self.end().min(total);

        let users = records.drain(start..end).collect();
        Page { users, total }
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<usize> {
    raw.parse::<usize>().map_err(|_| {
        BridgeError::InvalidArgument(format!("{} must be a positive integer, got '{}'", name, raw))
    })
}

/// One page of users plus the number of users drained
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub users: Vec<UserRecord>,
    pub total: usize,
}
