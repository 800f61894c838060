//! # Outbound Port: Transport
//!
//! The channel treats the socket as a black box that eventually reopens:
//! it consumes `TransportEvent`s and hands serialized frames to `send`.
//! Reconnect/backoff policy belongs to the transport implementation.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Buffer size for transport event streams.
pub const TRANSPORT_EVENT_CAPACITY: usize = 256;

/// Transport-level failures surfaced to the channel.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No socket is currently established.
    #[error("transport not connected")]
    NotConnected,

    /// The socket refused or failed to accept the frame.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Lifecycle and traffic events emitted by a transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A socket was established (first connect or reconnect).
    Opened,
    /// The current socket died; the transport will retry on its own.
    Closed,
    /// One inbound text frame.
    Message(String),
}

/// Reconnecting duplex message transport - outbound port.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Hand one serialized frame to the socket.
    ///
    /// Resolves once the transport has accepted the frame for delivery, or
    /// immediately with an error when it cannot.
    async fn send(&self, payload: String) -> Result<(), TransportError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Scripted reply generator: inspects an outbound request and returns the
/// inbound frames the fake server answers with.
pub type MockResponder = Box<dyn FnMut(&Value) -> Vec<Value> + Send>;

/// In-memory transport for tests.
///
/// Records every frame the channel sends, optionally answers through a
/// scripted responder, and lets the test drive `Opened`/`Closed`/`Message`
/// events by hand.
pub struct MockTransport {
    events: mpsc::Sender<TransportEvent>,
    sent: Mutex<Vec<Value>>,
    responder: Mutex<Option<MockResponder>>,
    fail_sends: AtomicBool,
}

impl MockTransport {
    /// Create a mock plus the event stream to feed into the channel.
    pub fn new() -> (Arc<Self>, mpsc::Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel(TRANSPORT_EVENT_CAPACITY);
        (
            Arc::new(Self {
                events: tx,
                sent: Mutex::new(Vec::new()),
                responder: Mutex::new(None),
                fail_sends: AtomicBool::new(false),
            }),
            rx,
        )
    }

    /// Script replies for subsequent sends.
    pub fn set_responder(&self, responder: MockResponder) {
        *self.responder.lock() = Some(responder);
    }

    /// Make every following `send` fail at the transport level.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Everything the channel has sent so far, decoded.
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().clone()
    }

    /// Emit a transport `Opened` event.
    pub async fn open(&self) {
        let _ = self.events.send(TransportEvent::Opened).await;
    }

    /// Emit a transport `Closed` event.
    pub async fn close(&self) {
        let _ = self.events.send(TransportEvent::Closed).await;
    }

    /// Inject one inbound frame, as if the server pushed it.
    pub async fn inject(&self, frame: Value) {
        let _ = self
            .events
            .send(TransportEvent::Message(frame.to_string()))
            .await;
    }

    /// Inject a raw (possibly malformed) inbound frame.
    pub async fn inject_raw(&self, frame: &str) {
        let _ = self
            .events
            .send(TransportEvent::Message(frame.to_string()))
            .await;
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, payload: String) -> Result<(), TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("mock failure".to_string()));
        }

        let frame: Value = serde_json::from_str(&payload)
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        self.sent.lock().push(frame.clone());

        let replies = {
            let mut responder = self.responder.lock();
            responder.as_mut().map(|r| r(&frame)).unwrap_or_default()
        };
        for reply in replies {
            let _ = self
                .events
                .send(TransportEvent::Message(reply.to_string()))
                .await;
        }
        Ok(())
    }
}
