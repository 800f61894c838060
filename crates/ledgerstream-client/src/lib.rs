//! # ledgerstream Client SDK
//!
//! End-to-end wiring of the ledger client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LEDGER CLIENT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ReconnectingWsTransport   (connect loop, backoff + jitter) │
//! │            │  Opened / Closed / Message                     │
//! │            ▼                                                │
//! │  RequestChannel            (correlation, pending, events)   │
//! │            │  ChannelEvent                                  │
//! │            ▼                                                │
//! │  LedgerMonitor             (attach, catch-up, live dispatch)│
//! │            │                                                │
//! │            ▼                                                │
//! │  PaymentListener callbacks per watched account              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ledgerstream_client::{ClientConfig, LedgerClient};
//!
//! let client = LedgerClient::connect(ClientConfig::default())?;
//! client.watch_account("rMerchant...", |tx| println!("paid: {}", tx.hash));
//! let receipt = client.submit_blob(&signed_blob).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod submit;
pub mod transport;

pub use client::{ClientError, LedgerClient};
pub use config::{BackoffConfig, ClientConfig};
pub use submit::{SubmitError, SubmitReceipt};
pub use transport::ws::ReconnectingWsTransport;

// Re-exports so SDK consumers need only this crate.
pub use ledgerstream_channel::{ChannelError, ChannelEvent, RequestChannel};
pub use ledgerstream_monitor::{LedgerMonitor, MonitorConfig, MonitorError, MonitorEvent};
pub use ledgerstream_types::LedgerTransaction;
