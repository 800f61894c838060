//! # Monitor Configuration

use serde::{Deserialize, Serialize};

/// Maximum transactions requested per `account_tx` page.
pub const DEFAULT_PAGE_LIMIT: usize = 200;

/// Default capacity of the catch-up dedup window.
pub const DEFAULT_DEDUP_WINDOW: usize = 4096;

/// Account monitor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Ledger index to resume catch-up from on the first connection.
    /// Catch-up starts at this value + 1.
    pub resume_ledger_index: u64,

    /// Transactions per historical page (`account_tx` limit).
    pub page_limit: usize,

    /// Capacity of the dedup window used while catching up. Eviction only
    /// weakens duplicate suppression; at-least-once delivery is unaffected.
    pub dedup_window: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            resume_ledger_index: 0,
            page_limit: DEFAULT_PAGE_LIMIT,
            dedup_window: DEFAULT_DEDUP_WINDOW,
        }
    }
}

impl MonitorConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            resume_ledger_index: 0,
            page_limit: 3,
            dedup_window: 16,
        }
    }
}
