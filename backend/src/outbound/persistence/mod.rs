//! PostgreSQL-backed adapters for the record store and audit store ports.

mod audit_store;
mod diesel_error;
mod models;
mod pool;
mod record_store;
mod schema;

pub use audit_store::DieselAuditStore;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use record_store::DieselRecordStore;
