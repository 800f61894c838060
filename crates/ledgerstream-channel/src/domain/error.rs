//! Channel error types.

use crate::ports::outbound::TransportError;
use thiserror::Error;

/// Errors a request can resolve with.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The transport refused the outbound frame.
    #[error("transport rejected send: {0}")]
    Transport(#[from] TransportError),

    /// No connection session is open.
    #[error("not connected")]
    NotConnected,

    /// The connection closed while the request was pending.
    #[error("disconnected during request")]
    Disconnected,

    /// The server sent something the protocol does not allow.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Explicit error response from the server.
    #[error("server error: {message}")]
    Server {
        /// Short server error code, when provided.
        code: Option<String>,
        /// Server-provided message.
        message: String,
    },
}

impl ChannelError {
    /// True for the synthetic error used to fail pending requests on close.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ChannelError::Disconnected)
    }
}
