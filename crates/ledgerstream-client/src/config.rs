//! # Client Configuration

use ledgerstream_monitor::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default websocket endpoint of the public ledger network.
pub const DEFAULT_ENDPOINT: &str = "wss://live.ledgerstream.net:9001/";

/// Reconnect backoff for the websocket transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first reconnect attempt.
    pub initial_delay_ms: u64,
    /// Upper bound for the exponential backoff.
    pub max_delay_ms: u64,
    /// Random jitter added on top of each delay.
    pub jitter_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            jitter_ms: 250,
        }
    }
}

impl BackoffConfig {
    /// First-retry delay.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Backoff ceiling.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Top-level client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Websocket endpoint URI.
    pub endpoint: String,
    /// Transport reconnect policy.
    pub reconnect: BackoffConfig,
    /// Account monitor settings (resume point, paging, dedup window).
    pub monitor: MonitorConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect: BackoffConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}
