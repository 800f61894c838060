//! End-to-end scenarios: a full client over an in-memory transport, driven
//! through the same event flow a real websocket produces.

pub mod lifecycle;
pub mod reconnect;

#[cfg(test)]
pub(crate) mod support {
    use ledgerstream_channel::ports::outbound::MockResponder;
    use ledgerstream_channel::MockTransport;
    use ledgerstream_client::LedgerClient;
    use ledgerstream_monitor::{MonitorConfig, MonitorEvent};
    use ledgerstream_types::LedgerTransaction;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::broadcast;

    /// A client wired to an in-memory transport, plus the transport handle
    /// used to script the far side of the connection.
    pub fn client(config: MonitorConfig) -> (Arc<MockTransport>, LedgerClient) {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();
        let (transport, events) = MockTransport::new();
        let client = LedgerClient::with_transport(transport.clone(), events, config);
        (transport, client)
    }

    /// Answers every subscribe with empty success; `account_tx` replies are
    /// consumed from the given queue, empty page once exhausted.
    pub fn scripted_responder(mut account_tx_results: Vec<Value>) -> MockResponder {
        account_tx_results.reverse();
        Box::new(move |request| {
            let id = request["id"].clone();
            let result = match request["command"].as_str() {
                Some("account_tx") => account_tx_results
                    .pop()
                    .unwrap_or_else(|| json!({ "transactions": [] })),
                _ => json!({}),
            };
            vec![json!({
                "id": id,
                "type": "response",
                "status": "success",
                "result": result
            })]
        })
    }

    pub fn payment_entry(hash: &str, destination: &str, result: &str) -> Value {
        json!({
            "tx": {
                "TransactionType": "Payment",
                "hash": hash,
                "Destination": destination
            },
            "meta": { "TransactionResult": result }
        })
    }

    pub fn live_payment(hash: &str, destination: &str) -> Value {
        json!({
            "type": "transaction",
            "status": "closed",
            "validated": true,
            "engine_result": "tesSUCCESS",
            "transaction": {
                "TransactionType": "Payment",
                "hash": hash,
                "Destination": destination
            }
        })
    }

    pub fn recording_listener(
        sink: Arc<Mutex<Vec<String>>>,
    ) -> impl Fn(&LedgerTransaction) + Send + Sync + 'static {
        move |tx: &LedgerTransaction| sink.lock().push(tx.hash.clone())
    }

    pub async fn await_live(events: &mut broadcast::Receiver<MonitorEvent>) {
        loop {
            match events.recv().await.unwrap() {
                MonitorEvent::Live => return,
                MonitorEvent::Error(err) => panic!("initialization failed: {err}"),
                _ => {}
            }
        }
    }

    /// Poll until the sink holds `expected` hashes, in order.
    pub async fn await_delivery(sink: &Arc<Mutex<Vec<String>>>, expected: &[&str]) {
        for _ in 0..500 {
            if sink.lock().len() >= expected.len() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(sink.lock().as_slice(), expected);
    }
}
