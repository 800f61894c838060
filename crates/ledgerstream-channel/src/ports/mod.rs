//! Ports: the transport boundary the channel is driven through.

pub mod outbound;

pub use outbound::{MockTransport, Transport, TransportError, TransportEvent};
