//! # Reconciliation State
//!
//! Tracks catch-up progress for the whole monitor, not per account.
//!
//! `internal_ledger` is monotonically non-decreasing and survives reconnects,
//! so catch-up always resumes from the last fully processed ledger. The dedup
//! window exists only between a reconnect and live convergence; it is bounded,
//! so a sufficiently large catch-up can re-deliver (at-least-once holds, the
//! suppression is best-effort).

use lru::LruCache;
use std::num::NonZeroUsize;

/// Catch-up progress and the live/dedup flags of one monitor.
#[derive(Debug)]
pub struct ReconciliationState {
    internal_ledger: u64,
    live: bool,
    dedup: Option<LruCache<String, ()>>,
}

impl ReconciliationState {
    /// Start from a caller-chosen resume point (0 = genesis).
    pub fn new(resume_ledger_index: u64) -> Self {
        Self {
            internal_ledger: resume_ledger_index,
            live: false,
            dedup: None,
        }
    }

    /// Last ledger index fully processed.
    pub fn internal_ledger(&self) -> u64 {
        self.internal_ledger
    }

    /// True once catch-up has converged with the live stream.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Number of hashes currently held in the dedup window.
    pub fn dedup_len(&self) -> usize {
        self.dedup.as_ref().map_or(0, LruCache::len)
    }

    /// Prepare for a fresh connection: not live, empty dedup window.
    /// `internal_ledger` is deliberately carried forward.
    pub fn reset_for_connection(&mut self, dedup_capacity: usize) {
        let capacity =
            NonZeroUsize::new(dedup_capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        self.live = false;
        self.dedup = Some(LruCache::new(capacity));
    }

    /// Catch-up converged: trust the push stream, drop the window.
    pub fn mark_live(&mut self) {
        self.live = true;
        self.dedup = None;
    }

    /// Decide whether a transaction hash should be delivered.
    ///
    /// While live every transaction passes unconditionally. While catching
    /// up, a hash passes once and is recorded; repeats within the window are
    /// suppressed.
    pub fn should_deliver(&mut self, hash: &str) -> bool {
        if self.live {
            return true;
        }
        match self.dedup.as_mut() {
            Some(window) => {
                if window.contains(hash) {
                    false
                } else {
                    window.put(hash.to_string(), ());
                    true
                }
            }
            // Never attached to a connection yet; nothing to dedup against.
            None => true,
        }
    }

    /// Advance the fully-processed ledger index. Never decreases.
    pub fn advance_ledger(&mut self, index: u64) {
        self.internal_ledger = self.internal_ledger.max(index);
    }
}
