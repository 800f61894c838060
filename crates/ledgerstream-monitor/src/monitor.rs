//! The account monitor: subscription registry, catch-up and live dispatch.
//!
//! Consumes channel events and re-synchronizes on every `Opened`:
//! re-attach subscriptions, replay history from `internal_ledger + 1`, then
//! go live. Catch-up runs as its own task so live notifications arriving
//! mid-replay still flow through the dedup window one at a time.

use crate::config::MonitorConfig;
use crate::domain::error::MonitorError;
use crate::domain::state::ReconciliationState;
use crate::ports::inbound::PaymentListener;
use futures::future::try_join_all;
use ledgerstream_channel::{ChannelEvent, RequestChannel};
use ledgerstream_types::{AccountTxPage, LedgerClosedNotification, LedgerTransaction};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Buffer size for the monitor's broadcast event stream.
pub const MONITOR_EVENT_CAPACITY: usize = 256;

/// Events the monitor emits to its observers.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Catch-up converged; the push stream is now authoritative.
    Live,
    /// The network closed a ledger with this index.
    LedgerClosed(u64),
    /// The attach/catch-up sequence failed for a connection attempt.
    /// Emitted exactly once per failed attempt.
    Error(Arc<MonitorError>),
}

struct MonitorState {
    recon: ReconciliationState,
    /// Watched accounts; listener order is delivery order. Accounts are
    /// never removed once watched.
    accounts: HashMap<String, Vec<Arc<dyn PaymentListener>>>,
    /// Bumped on every channel open; stale initializers check it before
    /// declaring the monitor live.
    generation: u64,
}

/// Delivers every confirmed payment addressed to a watched account, across
/// reconnects, with bounded duplicate suppression during catch-up.
pub struct LedgerMonitor {
    channel: Arc<RequestChannel>,
    config: MonitorConfig,
    state: Mutex<MonitorState>,
    events: broadcast::Sender<MonitorEvent>,
}

impl LedgerMonitor {
    /// Create a monitor on top of a request channel.
    pub fn new(channel: Arc<RequestChannel>, config: MonitorConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(MONITOR_EVENT_CAPACITY);
        let recon = ReconciliationState::new(config.resume_ledger_index);
        Arc::new(Self {
            channel,
            config,
            state: Mutex::new(MonitorState {
                recon,
                accounts: HashMap::new(),
                generation: 0,
            }),
            events,
        })
    }

    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    /// True once the current connection's catch-up has converged.
    pub fn is_live(&self) -> bool {
        self.state.lock().recon.is_live()
    }

    /// Last ledger index fully processed. Survives reconnects.
    pub fn internal_ledger(&self) -> u64 {
        self.state.lock().recon.internal_ledger()
    }

    /// Accounts currently watched.
    pub fn watched_accounts(&self) -> Vec<String> {
        self.state.lock().accounts.keys().cloned().collect()
    }

    /// Register interest in an account's incoming payments.
    ///
    /// Listeners are invoked in registration order. If the channel is
    /// connected and the account is new, a subscription is issued right away;
    /// otherwise it is attached on the next connection open. There is no
    /// unwatch: once watched, an account stays watched.
    pub fn watch_account<L>(&self, account: impl Into<String>, listener: L)
    where
        L: PaymentListener + 'static,
    {
        let account = account.into();
        debug!(account = %account, "adding account subscription");
        let needs_subscribe = {
            let mut state = self.state.lock();
            let is_new = !state.accounts.contains_key(&account);
            state
                .accounts
                .entry(account.clone())
                .or_default()
                .push(Arc::new(listener));
            is_new && self.channel.is_connected()
        };

        if needs_subscribe {
            // Fire-and-forget, like the attach on open: a failure here is
            // repaired by the catch-up of the next reconnect.
            let channel = self.channel.clone();
            tokio::spawn(async move {
                if let Err(err) = channel
                    .notify("subscribe", json!({ "accounts": [&account] }))
                    .await
                {
                    warn!(account = %account, %err, "account subscribe failed");
                }
            });
        }
    }

    /// Drive the monitor from a channel event stream until it ends.
    pub async fn run(self: Arc<Self>, mut events: broadcast::Receiver<ChannelEvent>) {
        loop {
            match events.recv().await {
                Ok(ChannelEvent::Opened) => {
                    let generation = {
                        let mut state = self.state.lock();
                        state.generation += 1;
                        state.generation
                    };
                    let monitor = self.clone();
                    tokio::spawn(async move { monitor.initialize(generation).await });
                }
                Ok(ChannelEvent::Transaction(tx)) => self.process_transaction(&tx),
                Ok(ChannelEvent::LedgerClosed(notification)) => self.ledger_closed(&notification),
                Ok(ChannelEvent::Closed) => debug!("disconnected from ledger network"),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "monitor lagged behind channel events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// ATTACHING → CATCHING_UP → LIVE for one connection attempt. Any failure
    /// is surfaced as a single `MonitorEvent::Error`; there is no partial
    /// advance to live.
    async fn initialize(self: Arc<Self>, generation: u64) {
        if let Err(err) = self.try_initialize(generation).await {
            if self.state.lock().generation != generation {
                debug!(%err, "stale initialization attempt; error suppressed");
                return;
            }
            let err = Arc::new(MonitorError::Initialization(Box::new(err)));
            warn!(%err, "initialization failed for this connection attempt");
            let _ = self.events.send(MonitorEvent::Error(err));
        }
    }

    async fn try_initialize(&self, generation: u64) -> Result<(), MonitorError> {
        let (accounts, from) = {
            let mut state = self.state.lock();
            state.recon.reset_for_connection(self.config.dedup_window);
            (
                state.accounts.keys().cloned().collect::<Vec<_>>(),
                state.recon.internal_ledger() + 1,
            )
        };

        debug!(count = accounts.len(), "attaching existing subscriptions");
        try_join_all(
            accounts
                .iter()
                .map(|account| self.subscribe_to_account(account)),
        )
        .await?;

        debug!(from, "catching up");
        try_join_all(
            accounts
                .iter()
                .map(|account| self.catchup_account(account, from)),
        )
        .await?;

        debug!("subscribing to ledger close stream");
        self.subscribe_to_ledger_stream().await?;

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                debug!("connection superseded during initialization");
                return Ok(());
            }
            state.recon.mark_live();
        }
        debug!("caught up and live");
        let _ = self.events.send(MonitorEvent::Live);
        Ok(())
    }

    async fn subscribe_to_account(&self, account: &str) -> Result<(), MonitorError> {
        debug!(account, "subscribing to account");
        self.channel
            .request("subscribe", json!({ "accounts": [account] }))
            .await?;
        Ok(())
    }

    async fn subscribe_to_ledger_stream(&self) -> Result<(), MonitorError> {
        self.channel
            .request("subscribe", json!({ "streams": ["ledger"] }))
            .await?;
        Ok(())
    }

    /// Replay an account's history from `from` to the present, one page at a
    /// time. Unsuccessful transactions are discarded with a diagnostic; the
    /// rest flow through the regular dispatch (and dedup, while not live).
    async fn catchup_account(&self, account: &str, from: u64) -> Result<(), MonitorError> {
        let mut marker: Option<Value> = None;
        loop {
            let params = json!({
                "account": account,
                "ledger_index_min": from,
                "ledger_index_max": -1,
                "marker": marker.clone().unwrap_or(Value::Null),
                "limit": self.config.page_limit,
            });
            let result = self.channel.request("account_tx", params).await?;
            let page: AccountTxPage = serde_json::from_value(result)
                .map_err(|err| MonitorError::Protocol(format!("bad account_tx page: {err}")))?;

            for entry in page.transactions {
                if !entry.meta.is_success() {
                    debug!(
                        hash = %entry.tx.hash,
                        result = %entry.meta.transaction_result,
                        "ignoring unsuccessful historical transaction"
                    );
                    continue;
                }
                self.process_transaction(&entry.tx);
            }

            match page.marker {
                Some(next) => marker = Some(next),
                None => return Ok(()),
            }
        }
    }

    /// Route one confirmed transaction to the listeners of its destination
    /// account. Non-payments are ignored; while catching up, hashes already
    /// seen in this pass are suppressed.
    fn process_transaction(&self, tx: &LedgerTransaction) {
        if !tx.is_payment() {
            debug!(transaction_type = %tx.transaction_type, "ignoring non-payment transaction");
            return;
        }

        let listeners = {
            let mut state = self.state.lock();
            if !state.recon.should_deliver(&tx.hash) {
                return;
            }
            tx.destination
                .as_deref()
                .and_then(|destination| state.accounts.get(destination).cloned())
                .unwrap_or_default()
        };

        // Lock released: listeners may call back into the monitor.
        for listener in listeners {
            listener.deliver(tx);
        }
    }

    /// A ledger closed while live: advance the resume point, notify
    /// observers, and opportunistically re-replay every account from that
    /// index to absorb anything the push stream missed. Failures here are
    /// logged per account and never revert the live state.
    fn ledger_closed(self: &Arc<Self>, notification: &LedgerClosedNotification) {
        let index = notification.ledger_index;
        let accounts = {
            let mut state = self.state.lock();
            if !state.recon.is_live() {
                debug!(ledger = index, "ignoring ledgerClosed before live");
                return;
            }
            state.recon.advance_ledger(index);
            state.accounts.keys().cloned().collect::<Vec<_>>()
        };

        debug!(ledger = index, "ledger closed");
        let _ = self.events.send(MonitorEvent::LedgerClosed(index));

        for account in accounts {
            let monitor = self.clone();
            tokio::spawn(async move {
                if let Err(err) = monitor.catchup_account(&account, index).await {
                    warn!(
                        account = %account,
                        ledger = index,
                        %err,
                        "opportunistic catch-up failed"
                    );
                }
            });
        }
    }
}
