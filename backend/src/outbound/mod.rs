//! Outbound adapters implementing the domain's ports: Postgres (record
//! store, audit store), Redis (cache), Kafka (event log + consumers).

pub mod cache;
pub mod event_log;
pub mod persistence;
