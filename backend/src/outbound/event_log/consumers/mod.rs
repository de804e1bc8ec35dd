//! The three independent, idempotent consumers of `route-events`: Cache
//! Invalidator, Cache Warmer, Audit Writer. Each runs its own consumer
//! group so every side effect sees every event independently
//! (`spec.md` §4.4).

mod audit_writer;
mod cache_invalidator;
mod cache_warmer;

pub use audit_writer::AuditWriter;
pub use cache_invalidator::CacheInvalidator;
pub use cache_warmer::CacheWarmer;

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;

use crate::domain::route_event::RouteEvent;

use super::ROUTE_EVENTS_TOPIC;

/// A consumer-group member that reacts to a single decoded [`RouteEvent`].
///
/// Implementors must be idempotent: delivery is at-least-once, and a
/// handler failure leaves the offset uncommitted so the broker redelivers.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    /// A short name used in log fields and the consumer group id.
    fn name(&self) -> &'static str;

    /// React to one event. Errors are logged; the poll loop does not commit
    /// the offset on failure, so redelivery will occur.
    async fn handle(&self, event: &RouteEvent) -> Result<(), String>;
}

/// Run `handler`'s poll loop until `shutdown` resolves.
///
/// Mirrors the teacher's long-lived background task shape: a `StreamConsumer`
/// in its own consumer group, manual offset commit only after a successful
/// handler call, and structured `tracing` on every event and failure.
pub async fn run_consumer(
    bootstrap_servers: &str,
    handler: Arc<dyn EventHandler>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> Result<(), String> {
    let group_id = format!("route-events.{}", handler.name());
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", bootstrap_servers)
        .set("group.id", &group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        .create()
        .map_err(|err| err.to_string())?;

    consumer
        .subscribe(&[ROUTE_EVENTS_TOPIC])
        .map_err(|err| err.to_string())?;

    let mut stream = consumer.stream();
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!(consumer = handler.name(), "consumer shutting down");
                    return Ok(());
                }
            }
            next = stream.next() => {
                let Some(message) = next else {
                    return Ok(());
                };
                match message {
                    Ok(borrowed) => {
                        let Some(payload) = borrowed.payload() else {
                            continue;
                        };
                        match serde_json::from_slice::<RouteEvent>(payload) {
                            Ok(event) => {
                                match handler.handle(&event).await {
                                    Ok(()) => {
                                        if let Err(err) = consumer.commit_message(&borrowed, rdkafka::consumer::CommitMode::Async) {
                                            tracing::warn!(consumer = handler.name(), %err, "offset commit failed");
                                        }
                                    }
                                    Err(err) => {
                                        tracing::warn!(
                                            consumer = handler.name(),
                                            event_id = %event.event_id,
                                            error = %err,
                                            "event handler failed; offset not committed, redelivery expected"
                                        );
                                    }
                                }
                            }
                            Err(err) => {
                                tracing::warn!(consumer = handler.name(), %err, "failed to decode route event; skipping");
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!(consumer = handler.name(), %err, "kafka stream error");
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    }
                }
            }
        }
    }
}
