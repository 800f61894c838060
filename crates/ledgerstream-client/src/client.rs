//! The SDK entry point: wires transport, channel and monitor together.

use crate::config::ClientConfig;
use crate::submit::{self, SubmitError, SubmitReceipt};
use crate::transport::ws::ReconnectingWsTransport;
use ledgerstream_channel::{
    ChannelError, ChannelEvent, RequestChannel, Transport, TransportEvent,
};
use ledgerstream_monitor::{LedgerMonitor, MonitorConfig, MonitorEvent, PaymentListener};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use url::Url;

/// Errors constructing a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured endpoint is not a valid URI.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Connected ledger client: request channel + account monitor over one
/// reconnecting websocket.
pub struct LedgerClient {
    channel: Arc<RequestChannel>,
    monitor: Arc<LedgerMonitor>,
}

impl LedgerClient {
    /// Connect to the configured endpoint. The transport reconnects forever
    /// in the background; the monitor re-synchronizes after every open.
    ///
    /// Must be called within a Tokio runtime.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let (transport, events) = ReconnectingWsTransport::spawn(endpoint, config.reconnect);
        Ok(Self::with_transport(transport, events, config.monitor))
    }

    /// Assemble a client over an arbitrary transport. Used by the tests with
    /// an in-memory transport; `connect` uses the websocket adapter.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        events: mpsc::Receiver<TransportEvent>,
        monitor_config: MonitorConfig,
    ) -> Self {
        let channel = RequestChannel::new(transport);
        let monitor = LedgerMonitor::new(channel.clone(), monitor_config);
        // The monitor subscribes before the pump starts, so it cannot miss
        // the first Opened.
        tokio::spawn(monitor.clone().run(channel.subscribe()));
        tokio::spawn(channel.clone().run(events));
        Self { channel, monitor }
    }

    /// The underlying request channel.
    pub fn channel(&self) -> &Arc<RequestChannel> {
        &self.channel
    }

    /// The underlying account monitor.
    pub fn monitor(&self) -> &Arc<LedgerMonitor> {
        &self.monitor
    }

    /// True while the websocket is up and a session is open.
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Issue a raw request against the server.
    pub async fn request(&self, command: &str, params: Value) -> Result<Value, ChannelError> {
        self.channel.request(command, params).await
    }

    /// Raw channel events: open/close plus typed notifications.
    pub fn channel_events(&self) -> broadcast::Receiver<ChannelEvent> {
        self.channel.subscribe()
    }

    /// Monitor events: live transitions, ledger closes, fatal init errors.
    pub fn monitor_events(&self) -> broadcast::Receiver<MonitorEvent> {
        self.monitor.subscribe()
    }

    /// Watch an account's incoming payments. See
    /// [`LedgerMonitor::watch_account`].
    pub fn watch_account<L>(&self, account: impl Into<String>, listener: L)
    where
        L: PaymentListener + 'static,
    {
        self.monitor.watch_account(account, listener);
    }

    /// Submit a signed, serialized transaction blob and interpret the
    /// engine result. See [`submit::submit_blob`].
    pub async fn submit_blob(&self, tx_blob: &str) -> Result<SubmitReceipt, SubmitError> {
        submit::submit_blob(&self.channel, tx_blob).await
    }
}
