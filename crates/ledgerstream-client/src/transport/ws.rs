//! # Reconnecting Websocket Transport
//!
//! Owns the socket lifecycle: connect, pump, reconnect with exponential
//! backoff + jitter. Emits `Opened`/`Message`/`Closed` events; `send` is an
//! ack-or-error handoff to the per-connection writer. The channel never sees
//! any of this machinery, only the `Transport` port.

use crate::config::BackoffConfig;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use ledgerstream_channel::{Transport, TransportError, TransportEvent};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

/// Buffer size for the per-connection writer queue.
const WRITER_QUEUE_CAPACITY: usize = 64;

/// Buffer size for the transport event stream fed to the channel.
const EVENT_QUEUE_CAPACITY: usize = 256;

struct OutboundFrame {
    payload: String,
    ack: oneshot::Sender<Result<(), TransportError>>,
}

/// Websocket transport that reconnects forever on its own schedule.
pub struct ReconnectingWsTransport {
    /// Writer queue of the current connection; `None` while down.
    outbound: Mutex<Option<mpsc::Sender<OutboundFrame>>>,
}

impl ReconnectingWsTransport {
    /// Start the connect loop. Returns the transport handle plus the event
    /// stream to feed into a `RequestChannel`.
    pub fn spawn(
        endpoint: Url,
        backoff: BackoffConfig,
    ) -> (Arc<Self>, mpsc::Receiver<TransportEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let transport = Arc::new(Self {
            outbound: Mutex::new(None),
        });
        tokio::spawn(connection_loop(
            transport.clone(),
            endpoint,
            backoff,
            events_tx,
        ));
        (transport, events_rx)
    }
}

#[async_trait]
impl Transport for ReconnectingWsTransport {
    async fn send(&self, payload: String) -> Result<(), TransportError> {
        let writer = self
            .outbound
            .lock()
            .clone()
            .ok_or(TransportError::NotConnected)?;
        let (ack_tx, ack_rx) = oneshot::channel();
        writer
            .send(OutboundFrame {
                payload,
                ack: ack_tx,
            })
            .await
            .map_err(|_| TransportError::NotConnected)?;
        // Writer dropped mid-flight means the socket died under us.
        ack_rx.await.map_err(|_| TransportError::NotConnected)?
    }
}

async fn connection_loop(
    transport: Arc<ReconnectingWsTransport>,
    endpoint: Url,
    backoff: BackoffConfig,
    events: mpsc::Sender<TransportEvent>,
) {
    let mut delay = backoff.initial_delay();
    loop {
        match connect_async(endpoint.as_str()).await {
            Ok((socket, _response)) => {
                debug!(endpoint = %endpoint, "websocket connected");
                delay = backoff.initial_delay();

                let (writer_tx, writer_rx) = mpsc::channel(WRITER_QUEUE_CAPACITY);
                *transport.outbound.lock() = Some(writer_tx);
                if events.send(TransportEvent::Opened).await.is_err() {
                    return;
                }

                drive_socket(socket, writer_rx, &events).await;

                *transport.outbound.lock() = None;
                debug!(endpoint = %endpoint, "websocket disconnected");
                if events.send(TransportEvent::Closed).await.is_err() {
                    return;
                }
            }
            Err(err) => warn!(endpoint = %endpoint, %err, "websocket connect failed"),
        }

        let jitter = if backoff.jitter_ms > 0 {
            Duration::from_millis(rand::thread_rng().gen_range(0..backoff.jitter_ms))
        } else {
            Duration::ZERO
        };
        tokio::time::sleep(delay + jitter).await;
        delay = (delay * 2).min(backoff.max_delay());
    }
}

/// Pump one socket until it dies: forward outbound frames with an ack,
/// forward inbound text frames as events.
async fn drive_socket(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut writer_rx: mpsc::Receiver<OutboundFrame>,
    events: &mpsc::Sender<TransportEvent>,
) {
    let (mut sink, mut source) = socket.split();
    loop {
        tokio::select! {
            frame = writer_rx.recv() => match frame {
                Some(OutboundFrame { payload, ack }) => {
                    let result = sink
                        .send(Message::Text(payload))
                        .await
                        .map_err(|err| TransportError::SendFailed(err.to_string()));
                    let failed = result.is_err();
                    let _ = ack.send(result);
                    if failed {
                        return;
                    }
                }
                None => return,
            },
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Message(text)).await.is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
            },
        }
    }
}
