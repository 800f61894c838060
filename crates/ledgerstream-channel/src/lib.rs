//! # ledgerstream Request Channel
//!
//! Turns a raw reconnecting message stream into a request/response protocol
//! plus a typed notification stream.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     REQUEST CHANNEL                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  request(cmd, params) ──► ConnectionSession                │
//! │                           (next correlation id,            │
//! │                            pending map ── oneshot)         │
//! │                                  │                         │
//! │  transport events ──► classify: response? ──► resolve id   │
//! │                                 notification? ──► broadcast│
//! │                                 close? ──► fail all pending│
//! └────────────────────────────────────────────────────────────┘
//!                 │                          │
//!          Transport (port)        ChannelEvent subscribers
//! ```
//!
//! Every request resolves exactly once: with the server's result, a server
//! error, a protocol error, or a synthetic disconnect error when the socket
//! dies. Correlation ids are per-session integers starting at 0; a reconnect
//! discards the old session entirely.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod channel;
pub mod domain;
pub mod ports;

pub use channel::{ChannelEvent, RequestChannel, EVENT_CHANNEL_CAPACITY};
pub use domain::correlation::CorrelationId;
pub use domain::error::ChannelError;
pub use ports::outbound::{MockTransport, Transport, TransportError, TransportEvent};
