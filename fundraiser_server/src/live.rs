//! The live update feed.
//!
//! Lifecycle events published by the engine are fanned out to every connected dashboard as Server-Sent
//! Events. Delivery is strictly best-effort: there is no replay for observers that connect late, no
//! acknowledgement, and a slow observer that lags behind the buffer simply misses events. Dashboards
//! bootstrap from the stats and history endpoints on connect and use the feed for freshness only.
use std::{convert::Infallible, future::Future, pin::Pin};

use actix_web::web::Bytes;
use futures::Stream;
use fundraiser_engine::events::{
    ContributionCreatedEvent,
    ContributionFailedEvent,
    ContributionPaidEvent,
    EventHooks,
};
use log::*;
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast::{self, error::RecvError};

pub const PAYMENT_CREATED: &str = "payment_created";
pub const PAYMENT_SUCCESS: &str = "payment_success";
pub const PAYMENT_FAILED: &str = "payment_failed";

/// One event as it goes over the wire: the SSE event name and the JSON payload, already serialized so
/// that every observer shares the same allocation.
#[derive(Debug, Clone)]
pub struct LiveEvent {
    pub kind: &'static str,
    pub payload: String,
}

/// Fan-out hub for live events.
///
/// Cloning is cheap; all clones publish into, and subscribe to, the same broadcast channel.
#[derive(Clone)]
pub struct LiveFeed {
    sender: broadcast::Sender<LiveEvent>,
}

impl LiveFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }

    pub fn publish<P: Serialize>(&self, kind: &'static str, payload: &P) {
        let payload = match serde_json::to_string(payload) {
            Ok(p) => p,
            Err(e) => {
                error!("📡️ Could not serialize {kind} event payload: {e}");
                return;
            },
        };
        match self.sender.send(LiveEvent { kind, payload }) {
            Ok(n) => trace!("📡️ {kind} delivered to {n} observers"),
            // No dashboards connected right now. Not an error for the publisher.
            Err(_) => trace!("📡️ {kind} had no observers"),
        }
    }

    /// The engine event hooks that republish every lifecycle transition onto this feed.
    pub fn hooks(&self) -> EventHooks {
        let mut hooks = EventHooks::default();
        let feed = self.clone();
        hooks.on_contribution_created(move |ev: ContributionCreatedEvent| {
            let feed = feed.clone();
            Box::pin(async move {
                feed.publish(PAYMENT_CREATED, &ev);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        let feed = self.clone();
        hooks.on_contribution_paid(move |ev: ContributionPaidEvent| {
            let feed = feed.clone();
            Box::pin(async move {
                let c = &ev.contribution;
                let payload = json!({
                    "amount": c.amount,
                    "ward": c.ward,
                    "quantity": c.quantity,
                    "contribution": c,
                });
                feed.publish(PAYMENT_SUCCESS, &payload);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        let feed = self.clone();
        hooks.on_contribution_failed(move |ev: ContributionFailedEvent| {
            let feed = feed.clone();
            Box::pin(async move {
                feed.publish(PAYMENT_FAILED, &ev);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        hooks
    }
}

/// Adapts a broadcast receiver into an SSE body stream.
///
/// A lagged receiver skips what it missed and keeps streaming; the dashboard's next stats poll covers
/// the gap. The stream ends when the feed itself is dropped.
pub fn event_stream(rx: broadcast::Receiver<LiveEvent>) -> impl Stream<Item = Result<Bytes, Infallible>> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let frame = format!("event: {}\ndata: {}\n\n", event.kind, event.payload);
                    return Some((Ok(Bytes::from(frame)), rx));
                },
                Err(RecvError::Lagged(skipped)) => {
                    debug!("📡️ Observer lagged; {skipped} events dropped");
                    continue;
                },
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod test {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn published_events_reach_subscribers() {
        let feed = LiveFeed::new(8);
        let mut rx = feed.subscribe();
        feed.publish(PAYMENT_SUCCESS, &json!({"amount": 700}));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, "payment_success");
        assert_eq!(event.payload, r#"{"amount":700}"#);
    }

    #[tokio::test]
    async fn publishing_without_observers_is_fine() {
        let feed = LiveFeed::new(8);
        feed.publish(PAYMENT_CREATED, &json!({"quantity": 1}));
    }

    #[tokio::test]
    async fn stream_formats_sse_frames() {
        let feed = LiveFeed::new(8);
        let rx = feed.subscribe();
        feed.publish(PAYMENT_FAILED, &json!({"reason": "declined"}));
        drop(feed);
        let frames: Vec<_> = event_stream(rx).collect().await;
        assert_eq!(frames.len(), 1);
        let bytes = frames[0].as_ref().unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text, "event: payment_failed\ndata: {\"reason\":\"declined\"}\n\n");
    }
}
