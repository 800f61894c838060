//! # ledgerstream Account Monitor
//!
//! Merges a bounded historical replay ("catch-up") with the live push stream
//! into a single, deduplicated, per-account payment feed, and re-synchronizes
//! that merge transparently after every reconnect.
//!
//! # State machine (per connection lifetime)
//!
//! ```text
//!        channel Opened
//!              │
//!              ▼
//!        ATTACHING      re-issue account subscriptions (parallel)
//!              │
//!              ▼
//!        CATCHING_UP    account_tx pages from internal_ledger + 1,
//!              │        dedup by hash while not live
//!              ▼
//!        LIVE           push stream trusted, dedup window discarded;
//!                       ledgerClosed advances internal_ledger and
//!                       triggers opportunistic re-catch-up
//! ```
//!
//! `internal_ledger` survives reconnects, so no gap is ever permanent:
//! delivery is at-least-once, with duplicates suppressed by a bounded window
//! only during the initial catch-up of each connection.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod domain;
pub mod monitor;
pub mod ports;

pub use config::MonitorConfig;
pub use domain::error::MonitorError;
pub use domain::state::ReconciliationState;
pub use monitor::{LedgerMonitor, MonitorEvent, MONITOR_EVENT_CAPACITY};
pub use ports::inbound::PaymentListener;
