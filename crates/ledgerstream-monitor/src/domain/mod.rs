//! Domain layer: reconciliation state and monitor errors.

pub mod error;
pub mod state;

pub use error::MonitorError;
pub use state::ReconciliationState;
