//! Correlation ID for request/response matching.
//!
//! The wire protocol requires small integer ids that restart at 0 on every
//! new connection, so these are plain per-session sequence numbers rather
//! than globally unique identifiers.

use std::fmt;

/// Correlation ID linking an outbound request to its eventual response.
///
/// Unique only while the request is pending within one connection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId(u64);

impl CorrelationId {
    /// Wrap a raw wire id.
    pub fn from_wire(id: u64) -> Self {
        Self(id)
    }

    /// The raw integer carried on the wire.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly increasing id allocator, one per connection session.
#[derive(Debug, Default)]
pub struct CorrelationSequence {
    next: u64,
}

impl CorrelationSequence {
    /// A fresh sequence starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id. Never reused within this sequence.
    pub fn next(&mut self) -> CorrelationId {
        let id = CorrelationId(self.next);
        self.next += 1;
        id
    }
}
