//! # Ledgerstream Test Suite
//!
//! Unified test crate for cross-crate scenarios that exercise the whole
//! client stack (transport → channel → monitor) through the public facade.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end scenarios over an in-memory transport
//!     ├── lifecycle.rs  # connect, catch up, go live, dispatch
//!     ├── reconnect.rs  # disconnect recovery and resumption
//!     └── submission.rs # transaction submission through the facade
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ledgerstream-tests
//!
//! # By scenario
//! cargo test -p ledgerstream-tests integration::lifecycle
//! cargo test -p ledgerstream-tests integration::reconnect
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
