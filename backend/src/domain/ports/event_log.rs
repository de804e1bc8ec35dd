//! Port for the ordered, partitioned event log bridging the write path to
//! the three consumers.

use async_trait::async_trait;

use crate::domain::route_event::RouteEvent;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the event log producer.
    pub enum EventLogError {
        /// The broker is unreachable or the publish timed out.
        Unavailable { message: String } => "event log unavailable: {message}",
        /// The broker rejected the publish after retries.
        Rejected { message: String } => "event log publish rejected: {message}",
    }
}

/// The single logical topic name (`spec.md` §4.3).
pub const ROUTE_EVENTS_TOPIC: &str = "route-events";

/// Minimum partition count the topic must be provisioned with.
pub const MIN_PARTITIONS: i32 = 3;

/// Ordered, keyed, idempotent publish.
///
/// The partition key is always the event's route identifier (canonical
/// string form), guaranteeing per-route ordering while permitting
/// cross-route parallelism.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Publish an event, waiting for full replication acknowledgment.
    ///
    /// # Errors
    /// Returns [`EventLogError`] on terminal failure after the producer's
    /// bounded retry is exhausted; callers (the Mutator) must treat this as
    /// best-effort and never fail the user-visible write because of it.
    async fn publish(&self, event: &RouteEvent) -> Result<(), EventLogError>;
}
