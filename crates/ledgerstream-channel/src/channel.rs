//! The request channel: correlation, resolution, notification fan-out.
//!
//! Driven entirely by transport events. A fresh `ConnectionSession` is
//! created on every `Opened`, and every still-pending request is failed with
//! a synthetic disconnect error on `Closed` - exactly once per disconnect.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::ChannelError;
use crate::domain::session::ConnectionSession;
use crate::ports::outbound::{Transport, TransportEvent};
use ledgerstream_types::{
    is_engine_success, request_payload, LedgerClosedNotification, LedgerTransaction,
    ResponseEnvelope, ResponseStatus, TransactionNotification,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

/// Buffer size for the channel's broadcast event stream.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Events the channel re-emits to its observers.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A connection session was established.
    Opened,
    /// The connection session ended; pending requests were failed.
    Closed,
    /// A closed, validated transaction with a successful engine result.
    Transaction(LedgerTransaction),
    /// The network closed a ledger.
    LedgerClosed(LedgerClosedNotification),
}

#[derive(Debug, Default)]
struct SessionSlot {
    current: Option<ConnectionSession>,
    next_epoch: u64,
}

/// Reconnect-safe request/response correlation layer.
pub struct RequestChannel {
    transport: Arc<dyn Transport>,
    session: Mutex<SessionSlot>,
    events: broadcast::Sender<ChannelEvent>,
}

impl RequestChannel {
    /// Wrap a transport. The channel stays inert until [`run`](Self::run)
    /// (or [`handle_event`](Self::handle_event)) feeds it transport events.
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            session: Mutex::new(SessionSlot::default()),
            events,
        })
    }

    /// Subscribe to channel events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }

    /// True while a connection session is open.
    pub fn is_connected(&self) -> bool {
        self.session.lock().current.is_some()
    }

    /// Drive the channel from a transport event stream until it ends.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        debug!("transport event stream ended");
    }

    /// Apply one transport event.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.handle_open(),
            TransportEvent::Closed => self.handle_close(),
            TransportEvent::Message(raw) => self.handle_message(&raw),
        }
    }

    /// Issue a request and await its response.
    ///
    /// Completes exactly once: with the server's result payload, a server
    /// error, a protocol error, or a disconnect error if the socket dies
    /// first. The pending entry is registered before the frame reaches the
    /// transport, so a response racing the send acknowledgment is never lost.
    pub async fn request(&self, command: &str, params: Value) -> Result<Value, ChannelError> {
        let (epoch, id, rx) = {
            let mut slot = self.session.lock();
            let session = slot.current.as_mut().ok_or(ChannelError::NotConnected)?;
            let id = session.next_id();
            let (tx, rx) = oneshot::channel();
            session.pending.register(id, tx);
            (session.epoch(), id, rx)
        };

        let payload = request_payload(id.value(), command, params);
        debug!(%id, command, "--> request");

        if let Err(err) = self.transport.send(payload.to_string()).await {
            // Roll back the registration; the epoch check keeps us from
            // touching a successor session whose ids restarted at 0.
            let mut slot = self.session.lock();
            if let Some(session) = slot.current.as_mut() {
                if session.epoch() == epoch {
                    session.pending.cancel(id);
                }
            }
            return Err(ChannelError::Transport(err));
        }

        match rx.await {
            Ok(outcome) => outcome,
            // Completion dropped without resolving: session torn down.
            Err(_) => Err(ChannelError::Disconnected),
        }
    }

    /// Fire-and-forget request: an id is allocated and sent but nothing is
    /// tracked, so no response will ever be observed for it.
    pub async fn notify(&self, command: &str, params: Value) -> Result<(), ChannelError> {
        let id = {
            let mut slot = self.session.lock();
            let session = slot.current.as_mut().ok_or(ChannelError::NotConnected)?;
            session.next_id()
        };
        let payload = request_payload(id.value(), command, params);
        debug!(%id, command, "--> notify");
        self.transport
            .send(payload.to_string())
            .await
            .map_err(ChannelError::from)
    }

    fn handle_open(&self) {
        {
            let mut slot = self.session.lock();
            if let Some(stale) = slot.current.as_mut() {
                // Open without an intervening close: drain the stale session
                // so its requests still resolve exactly once.
                warn!("transport reopened without close; failing stale session");
                stale.pending.fail_all_disconnected();
            }
            let epoch = slot.next_epoch;
            slot.next_epoch += 1;
            slot.current = Some(ConnectionSession::new(epoch));
        }
        debug!("connected");
        let _ = self.events.send(ChannelEvent::Opened);
    }

    fn handle_close(&self) {
        let closed = {
            let mut slot = self.session.lock();
            match slot.current.take() {
                Some(mut session) => {
                    let pending = session.pending.len();
                    session.pending.fail_all_disconnected();
                    debug!(pending, "disconnected");
                    true
                }
                None => false,
            }
        };
        if closed {
            let _ = self.events.send(ChannelEvent::Closed);
        }
    }

    fn handle_message(&self, raw: &str) {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(err) => {
                warn!(%err, "dropping undecodable frame");
                return;
            }
        };

        if let Some(wire_id) = value.get("id").and_then(Value::as_u64) {
            if self.resolve_response(CorrelationId::from_wire(wire_id), &value) {
                return;
            }
        }

        match value.get("type").and_then(Value::as_str) {
            // Response with no matching pending request: already resolved,
            // unknown, or fire-and-forget. Dropped silently.
            Some("response") => {}
            Some("transaction") => self.handle_transaction(value),
            Some("ledgerClosed") => self.handle_ledger_closed(value),
            other => warn!(kind = ?other, "unhandled notification type"),
        }
    }

    /// Resolve the pending request for `id`, if any. Returns false when
    /// nothing was pending under that id.
    fn resolve_response(&self, id: CorrelationId, value: &Value) -> bool {
        let completion = {
            let mut slot = self.session.lock();
            slot.current.as_mut().and_then(|s| s.pending.take(id))
        };
        let Some(completion) = completion else {
            return false;
        };

        let outcome = match serde_json::from_value::<ResponseEnvelope>(value.clone()) {
            Ok(envelope) => match envelope.status {
                Some(ResponseStatus::Success) => {
                    debug!(%id, "<-- response: success");
                    Ok(envelope.result.unwrap_or(Value::Null))
                }
                Some(ResponseStatus::Error) => {
                    debug!(%id, error = ?envelope.error, "<-- response: error");
                    Err(ChannelError::Server {
                        code: envelope.error.clone(),
                        message: envelope.error_text(),
                    })
                }
                None => Err(ChannelError::Protocol(format!(
                    "response {id} carries no known status"
                ))),
            },
            Err(err) => Err(ChannelError::Protocol(format!("malformed response: {err}"))),
        };

        // Receiver may have stopped waiting; that is its business.
        let _ = completion.send(outcome);
        true
    }

    fn handle_transaction(&self, value: Value) {
        let notification: TransactionNotification = match serde_json::from_value(value) {
            Ok(n) => n,
            Err(err) => {
                warn!(%err, "dropping malformed transaction notification");
                return;
            }
        };

        if notification.status.as_deref() != Some("closed") || !notification.validated {
            warn!(
                status = ?notification.status,
                validated = notification.validated,
                "dropping non-final transaction notification"
            );
            return;
        }

        match notification.engine_result.as_deref() {
            Some(code) if is_engine_success(code) => {
                let _ = self
                    .events
                    .send(ChannelEvent::Transaction(notification.transaction));
            }
            other => debug!(
                engine_result = ?other,
                hash = %notification.transaction.hash,
                "dropping unsuccessful transaction notification"
            ),
        }
    }

    fn handle_ledger_closed(&self, value: Value) {
        match serde_json::from_value::<LedgerClosedNotification>(value) {
            Ok(notification) => {
                let _ = self.events.send(ChannelEvent::LedgerClosed(notification));
            }
            Err(err) => warn!(%err, "dropping malformed ledgerClosed notification"),
        }
    }
}
