//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_store;
mod cache;
mod event_log;
mod record_store;

pub use audit_store::{AuditStore, AuditStoreError};
pub use cache::{
    Cache, CacheError, CacheValue, DEFAULT_NEGATIVE_TTL, DEFAULT_POSITIVE_TTL, NOT_FOUND_SENTINEL,
};
pub use event_log::{EventLog, EventLogError, MIN_PARTITIONS, ROUTE_EVENTS_TOPIC};
pub use record_store::{
    CreateOutcome, EndpointRecord, RecordStore, RecordStoreError, ToggleOutcome,
};


#[cfg(test)]
pub(crate) use mocks::{MockAuditStore, MockCache, MockEventLog, MockRecordStore};
