//! Per-connection session state.
//!
//! One session exists per socket lifetime. It owns the correlation sequence
//! and the pending map; both are discarded together when the socket closes,
//! so ids from a dead connection can never resolve requests of a new one.

use crate::domain::correlation::{CorrelationId, CorrelationSequence};
use crate::domain::pending::PendingRequests;

/// State of the channel while one socket lifetime is open.
#[derive(Debug)]
pub struct ConnectionSession {
    /// Distinguishes this session from earlier/later ones, since correlation
    /// ids restart at 0 on every reconnect.
    epoch: u64,
    ids: CorrelationSequence,
    /// Requests awaiting a response on this session.
    pub pending: PendingRequests,
}

impl ConnectionSession {
    /// Fresh session: id counter at 0, empty pending map.
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            ids: CorrelationSequence::new(),
            pending: PendingRequests::new(),
        }
    }

    /// Session epoch, unique across the channel's lifetime.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Allocate the next correlation id for this session.
    pub fn next_id(&mut self) -> CorrelationId {
        self.ids.next()
    }
}
