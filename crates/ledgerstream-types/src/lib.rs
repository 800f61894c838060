//! # ledgerstream Types Crate
//!
//! Wire envelopes and ledger domain types shared across the workspace.
//!
//! ## Clusters
//!
//! - **Wire**: `request_payload` (outbound), `ResponseEnvelope`,
//!   `TransactionNotification`, `LedgerClosedNotification` (inbound)
//! - **Ledger**: `LedgerTransaction`, `AccountTxPage`, engine-result helpers
//!
//! The server speaks JSON over a single websocket: requests carry an integer
//! `id` and are answered by a `type: "response"` message with the same `id`;
//! everything without an `id` is a push notification.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod transaction;
pub mod wire;

pub use transaction::{
    is_engine_success, AccountTxEntry, AccountTxPage, LedgerTransaction, TransactionMeta,
    PAYMENT_TRANSACTION_TYPE, TES_SUCCESS,
};
pub use wire::{
    request_payload, LedgerClosedNotification, ResponseEnvelope, ResponseStatus,
    TransactionNotification,
};
