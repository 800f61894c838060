//! Ports: the listener boundary payments are delivered through.

pub mod inbound;

pub use inbound::PaymentListener;
