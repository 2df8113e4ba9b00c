//! Scan Module
//!
//! Emulates offset/limit listing over the gateway's batched scanner.
//!
//! ## Algorithm
//! 1. Open a scanner with the configured batch size
//! 2. Read batches until the gateway reports exhaustion
//! 3. Decode every row (fail-fast)
//! 4. Release the scanner, on success and on error
//! 5. Sort by id (byte order) and slice `[(page-1)*limit, page*limit)`

mod page;
mod scanner;

pub use page::{Page, PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_PAGE_LIMIT};
pub use scanner::ScanPager;
