//! # Inbound Port: Payment Listener
//!
//! Explicit observer registry instead of ambient event-emitter semantics:
//! each watched account keeps its listeners in registration order, and that
//! order is the delivery order.

use ledgerstream_types::LedgerTransaction;

/// Receives confirmed payments addressed to a watched account.
///
/// `deliver` is called from the monitor's dispatch path and must not block;
/// hand the transaction off to a channel or queue for heavy work.
pub trait PaymentListener: Send + Sync {
    /// One confirmed payment whose destination is the watched account.
    fn deliver(&self, transaction: &LedgerTransaction);
}

impl<F> PaymentListener for F
where
    F: Fn(&LedgerTransaction) + Send + Sync,
{
    fn deliver(&self, transaction: &LedgerTransaction) {
        self(transaction)
    }
}
