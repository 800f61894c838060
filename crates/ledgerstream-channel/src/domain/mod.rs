//! Domain layer: correlation ids, the pending-request map and the
//! per-connection session that owns both.

pub mod correlation;
pub mod error;
pub mod pending;
pub mod session;

pub use correlation::{CorrelationId, CorrelationSequence};
pub use error::ChannelError;
pub use pending::PendingRequests;
pub use session::ConnectionSession;
