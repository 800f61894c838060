//! # Client Lifecycle Tests
//!
//! The full happy path through the public facade:
//!
//! ```text
//! watch ──→ open ──→ attach subscriptions ──→ replay history ──→ LIVE
//!                                                                 │
//!                          push notifications ──→ listeners ←─────┘
//! ```
//!
//! Covers catch-up ordering, duplicate suppression across the
//! history/stream seam, per-account routing, and ledger-close progress.

#[cfg(test)]
mod tests {
    use crate::integration::support::*;
    use ledgerstream_monitor::{MonitorConfig, MonitorEvent};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_watch_catch_up_go_live_then_dispatch() {
        let (transport, client) = client(MonitorConfig::default());
        let mut events = client.monitor_events();

        let seen = Arc::new(Mutex::new(Vec::new()));
        client.watch_account("rAlice", recording_listener(seen.clone()));

        transport.set_responder(scripted_responder(vec![json!({
            "transactions": [
                payment_entry("H1", "rAlice", "tesSUCCESS"),
                payment_entry("H2", "rAlice", "tesSUCCESS"),
            ]
        })]));

        transport.open().await;
        await_live(&mut events).await;
        assert!(client.is_connected());
        assert!(client.monitor().is_live());

        // History first, then the stream takes over.
        transport.inject(live_payment("H3", "rAlice")).await;
        await_delivery(&seen, &["H1", "H2", "H3"]).await;
    }

    #[tokio::test]
    async fn test_history_duplicated_on_stream_is_suppressed() {
        let (transport, client) = client(MonitorConfig::default());
        let mut events = client.monitor_events();

        let seen = Arc::new(Mutex::new(Vec::new()));
        client.watch_account("rAlice", recording_listener(seen.clone()));

        transport.set_responder(scripted_responder(vec![json!({
            "transactions": [payment_entry("H1", "rAlice", "tesSUCCESS")]
        })]));

        transport.open().await;
        // The stream redelivers H1 while catch-up is still the authority;
        // the dedup window absorbs it exactly once.
        transport.inject(live_payment("H1", "rAlice")).await;
        await_live(&mut events).await;

        transport.inject(live_payment("H2", "rAlice")).await;
        await_delivery(&seen, &["H1", "H2"]).await;
    }

    #[tokio::test]
    async fn test_payments_routed_per_account() {
        let (transport, client) = client(MonitorConfig::default());
        let mut events = client.monitor_events();

        let alice = Arc::new(Mutex::new(Vec::new()));
        let bob = Arc::new(Mutex::new(Vec::new()));
        client.watch_account("rAlice", recording_listener(alice.clone()));
        client.watch_account("rBob", recording_listener(bob.clone()));

        transport.set_responder(scripted_responder(vec![]));
        transport.open().await;
        await_live(&mut events).await;

        transport.inject(live_payment("A1", "rAlice")).await;
        transport.inject(live_payment("B1", "rBob")).await;
        transport.inject(live_payment("C1", "rCarol")).await;
        transport.inject(live_payment("A2", "rAlice")).await;

        await_delivery(&alice, &["A1", "A2"]).await;
        await_delivery(&bob, &["B1"]).await;
    }

    #[tokio::test]
    async fn test_ledger_close_advances_resume_point() {
        let (transport, client) = client(MonitorConfig::default());
        let mut events = client.monitor_events();

        client.watch_account("rAlice", |_: &ledgerstream_types::LedgerTransaction| {});
        transport.set_responder(scripted_responder(vec![]));
        transport.open().await;
        await_live(&mut events).await;

        transport
            .inject(json!({ "type": "ledgerClosed", "ledger_index": 7100 }))
            .await;
        loop {
            if let MonitorEvent::LedgerClosed(index) = events.recv().await.unwrap() {
                assert_eq!(index, 7100);
                break;
            }
        }
        assert_eq!(client.monitor().internal_ledger(), 7100);
    }

    #[tokio::test]
    async fn test_raw_requests_share_the_channel() {
        let (transport, client) = client(MonitorConfig::default());
        let mut events = client.monitor_events();

        transport.set_responder(Box::new(|request| {
            let result = match request["command"].as_str() {
                Some("ledger_current") => json!({ "ledger_current_index": 7101 }),
                _ => json!({}),
            };
            vec![json!({
                "id": request["id"],
                "type": "response",
                "status": "success",
                "result": result
            })]
        }));
        transport.open().await;
        await_live(&mut events).await;

        let result = client
            .request("ledger_current", json!({}))
            .await
            .unwrap();
        assert_eq!(result["ledger_current_index"], 7101);
    }
}
