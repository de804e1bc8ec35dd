//! `rdkafka`-backed `EventLog` producer: idempotent, full-ack, bounded retry.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::domain::ports::{EventLog, EventLogError, ROUTE_EVENTS_TOPIC};
use crate::domain::route_event::RouteEvent;

/// Bounded publish timeout (`spec.md` §4.3): 10 seconds.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Producer-level retries on transient errors before giving up.
const MAX_RETRIES: &str = "3";

/// `FutureProducer` wired for idempotence and full-replication acks, with
/// identifier-keyed, ordered publish to [`ROUTE_EVENTS_TOPIC`].
pub struct KafkaEventLog {
    producer: FutureProducer,
}

impl KafkaEventLog {
    /// # Errors
    /// Returns [`EventLogError::Unavailable`] if the producer cannot be
    /// constructed from `bootstrap_servers`.
    pub fn new(bootstrap_servers: &str) -> Result<Self, EventLogError> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", bootstrap_servers)
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", MAX_RETRIES)
            .set("message.timeout.ms", PUBLISH_TIMEOUT.as_millis().to_string())
            .create()
            .map_err(|err| EventLogError::unavailable(err.to_string()))?;
        Ok(Self { producer })
    }
}

#[async_trait]
impl EventLog for KafkaEventLog {
    async fn publish(&self, event: &RouteEvent) -> Result<(), EventLogError> {
        let key = event
            .identifier()
            .map_err(|err| EventLogError::rejected(err.to_string()))?
            .canonical();
        let payload = serde_json::to_vec(event)
            .map_err(|err| EventLogError::rejected(err.to_string()))?;

        let record = FutureRecord::to(ROUTE_EVENTS_TOPIC)
            .key(&key)
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(PUBLISH_TIMEOUT))
            .await
            .map_err(|(err, _owned_message)| EventLogError::unavailable(err.to_string()))?;

        Ok(())
    }
}
