//! Transaction submission over the request channel.
//!
//! `submit` takes a pre-signed blob; the server replies with the engine's
//! provisional verdict plus the decoded transaction. Only `tesSUCCESS` is
//! treated as accepted here. A successful submit is not finality; the
//! transaction still has to appear in a closed ledger.

use ledgerstream_channel::{ChannelError, RequestChannel};
use ledgerstream_types::is_engine_success;
use serde_json::json;
use thiserror::Error;

/// Submission failures.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request itself failed (disconnect, server-level error).
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// The response arrived but did not carry the fields submit promises.
    #[error("malformed submit response: {0}")]
    Protocol(String),
    /// The engine rejected the transaction.
    #[error("transaction rejected: {result}: {message}")]
    Engine { result: String, message: String },
}

/// Identity of a provisionally accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Transaction hash, usable as a dedup / lookup key.
    pub hash: String,
    /// Account sequence the transaction consumed.
    pub sequence: u64,
}

/// Submit a signed transaction blob and interpret the engine result.
pub async fn submit_blob(
    channel: &RequestChannel,
    tx_blob: &str,
) -> Result<SubmitReceipt, SubmitError> {
    let result = channel
        .request("submit", json!({ "tx_blob": tx_blob }))
        .await?;

    let engine_result = result["engine_result"]
        .as_str()
        .ok_or_else(|| SubmitError::Protocol("missing engine_result".to_string()))?;
    if !is_engine_success(engine_result) {
        let message = result["engine_result_message"]
            .as_str()
            .unwrap_or("")
            .to_string();
        return Err(SubmitError::Engine {
            result: engine_result.to_string(),
            message,
        });
    }

    let tx_json = &result["tx_json"];
    let hash = tx_json["hash"]
        .as_str()
        .ok_or_else(|| SubmitError::Protocol("missing tx_json.hash".to_string()))?
        .to_string();
    let sequence = tx_json["Sequence"]
        .as_u64()
        .ok_or_else(|| SubmitError::Protocol("missing tx_json.Sequence".to_string()))?;

    Ok(SubmitReceipt { hash, sequence })
}
