//! # Ledger Transactions
//!
//! Confirmed-transaction shapes shared by the live push stream and the
//! `account_tx` historical endpoint. Field names follow the server's wire
//! format (capitalized transaction fields, snake_case metadata).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical engine result code for a successfully applied transaction.
pub const TES_SUCCESS: &str = "tesSUCCESS";

/// Transaction type relevant to account monitoring.
pub const PAYMENT_TRANSACTION_TYPE: &str = "Payment";

/// True when an engine result code denotes success.
pub fn is_engine_success(code: &str) -> bool {
    code == TES_SUCCESS
}

/// A confirmed transaction as reported by the ledger network.
///
/// Only the fields the monitor routes on are typed; everything else is kept
/// verbatim in `extra` and handed to listeners untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Transaction type, e.g. `"Payment"`.
    #[serde(rename = "TransactionType")]
    pub transaction_type: String,
    /// Unique transaction hash.
    pub hash: String,
    /// Sending account, when present.
    #[serde(rename = "Account", skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Receiving account for payments.
    #[serde(rename = "Destination", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Payment amount; either a drops string or a currency object.
    #[serde(rename = "Amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    /// Index of the ledger that includes this transaction, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_index: Option<u64>,
    /// Remaining wire fields (Fee, Sequence, signatures, tags, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LedgerTransaction {
    /// True for payment transactions, the only type the monitor dispatches.
    pub fn is_payment(&self) -> bool {
        self.transaction_type == PAYMENT_TRANSACTION_TYPE
    }
}

/// Per-transaction metadata attached by the ledger on application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMeta {
    /// Engine result the transaction finalized with.
    #[serde(rename = "TransactionResult")]
    pub transaction_result: String,
    /// Remaining metadata fields (affected nodes, delivered amount, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionMeta {
    /// True when the transaction was applied successfully.
    pub fn is_success(&self) -> bool {
        is_engine_success(&self.transaction_result)
    }
}

/// One entry of an `account_tx` result page.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountTxEntry {
    /// The transaction.
    pub tx: LedgerTransaction,
    /// Its application metadata.
    pub meta: TransactionMeta,
}

/// One page of an `account_tx` response.
///
/// `marker` is the opaque continuation cursor; absent on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountTxPage {
    /// Transactions in the requested range, oldest first.
    pub transactions: Vec<AccountTxEntry>,
    /// Continuation marker for the next page, if any.
    #[serde(default)]
    pub marker: Option<Value>,
}
