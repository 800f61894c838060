//! # Wire Envelopes
//!
//! JSON shapes exchanged with the ledger server.
//!
//! Outbound requests are plain objects with an integer `id`, a `command`
//! string and command-specific parameters merged at the top level. Inbound
//! traffic is either a response (carries `id`) or a push notification
//! (carries `type` but no `id`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transaction::LedgerTransaction;

/// Build the outbound request payload: `{ id, command, ...params }`.
///
/// `params` must be a JSON object or `null`; any other shape is the caller's
/// bug and its fields are dropped.
pub fn request_payload(id: u64, command: &str, params: Value) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), Value::from(id));
    map.insert("command".to_string(), Value::from(command));
    if let Value::Object(extra) = params {
        for (k, v) in extra {
            // id/command always win over caller-supplied fields
            map.entry(k).or_insert(v);
        }
    }
    Value::Object(map)
}

/// Status field of a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Request succeeded; `result` carries the payload.
    Success,
    /// Request failed; `error` / `error_message` carry the cause.
    Error,
}

/// A response to a previously issued request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Correlation id echoing the request.
    pub id: u64,
    /// Message type; the server sets this to `"response"`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Outcome of the request. Absent or unknown values are a protocol error.
    pub status: Option<ResponseStatus>,
    /// Result payload on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// Short server error code on failure.
    pub error: Option<String>,
    /// Human-readable server error message on failure.
    pub error_message: Option<String>,
}

impl ResponseEnvelope {
    /// Best server-provided description of a failed request.
    pub fn error_text(&self) -> String {
        self.error_message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "unspecified server error".to_string())
    }
}

/// Push notification for a transaction applied to a closed, validated ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionNotification {
    /// Lifecycle status; only `"closed"` is expected on this stream.
    pub status: Option<String>,
    /// Whether the containing ledger is validated.
    #[serde(default)]
    pub validated: bool,
    /// Engine result code for the transaction.
    pub engine_result: Option<String>,
    /// The transaction itself.
    pub transaction: LedgerTransaction,
}

impl TransactionNotification {
    /// True when the notification describes a final, successfully applied
    /// transaction (closed, validated, successful engine result).
    pub fn is_final_success(&self) -> bool {
        self.status.as_deref() == Some("closed")
            && self.validated
            && self
                .engine_result
                .as_deref()
                .is_some_and(crate::transaction::is_engine_success)
    }
}

/// Push notification emitted every time the network closes a ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerClosedNotification {
    /// Index of the ledger that just closed.
    pub ledger_index: u64,
    /// Remaining server-provided fields (hash, txn count, fee schedule, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
