//! # Monitor Errors

use ledgerstream_channel::ChannelError;
use thiserror::Error;

/// Errors raised while reconciling ledger events.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A channel request failed (transport, server or disconnect).
    #[error("channel request failed: {0}")]
    Channel(#[from] ChannelError),

    /// The server returned a payload the monitor cannot interpret.
    #[error("malformed server payload: {0}")]
    Protocol(String),

    /// The attach/catch-up sequence failed for a connection attempt.
    /// Carries the first inner failure; the attempt is abandoned as a whole.
    #[error("initialization failed: {0}")]
    Initialization(#[source] Box<MonitorError>),
}
