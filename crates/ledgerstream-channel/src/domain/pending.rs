//! Pending-request map for one connection session.
//!
//! Maps correlation ids to the oneshot senders of callers currently awaiting
//! a response. Owned exclusively by the session; the channel's mutex is the
//! only synchronization.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::ChannelError;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::debug;

/// Completion side of one in-flight request.
pub type Completion = oneshot::Sender<Result<Value, ChannelError>>;

/// In-flight requests awaiting their response.
#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: HashMap<CorrelationId, Completion>,
}

impl PendingRequests {
    /// Empty map for a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a request under its correlation id.
    pub fn register(&mut self, id: CorrelationId, completion: Completion) {
        debug_assert!(!self.entries.contains_key(&id), "correlation id reused");
        self.entries.insert(id, completion);
    }

    /// Remove and return the completion for `id`, if still pending.
    pub fn take(&mut self, id: CorrelationId) -> Option<Completion> {
        self.entries.remove(&id)
    }

    /// Drop the entry for `id` without resolving it.
    ///
    /// Used to roll back registration when the transport refuses the send;
    /// the caller reports the transport error itself.
    pub fn cancel(&mut self, id: CorrelationId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Resolve every pending request with a disconnect error.
    pub fn fail_all_disconnected(&mut self) {
        let drained = self.entries.drain();
        for (id, completion) in drained {
            debug!(%id, "failing pending request: disconnected");
            // Receiver may be gone if the caller stopped waiting.
            let _ = completion.send(Err(ChannelError::Disconnected));
        }
    }

    /// Number of requests currently pending.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
