//! Port for the durable, append-only audit store.

use async_trait::async_trait;

use crate::domain::audit::{AuditDocument, AuditQueryFilter};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the audit store adapter.
    pub enum AuditStoreError {
        /// Database connectivity or transaction failures.
        Connection { message: String } => "audit store connection failed: {message}",
        /// Catch-all for write failures that bubble up from the adapter.
        Write { message: String } => "audit store write failed: {message}",
    }
}

/// Append-only document writes with indexed queries by route, time, action.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist a document, deduplicating on `event_id`. Writing the same
    /// `event_id` twice (as happens under at-least-once redelivery) must be
    /// a no-op, not a duplicate row.
    async fn record(&self, document: &AuditDocument) -> Result<(), AuditStoreError>;

    /// Query persisted documents, newest first, bounded by `filter.limit`.
    async fn query(&self, filter: &AuditQueryFilter) -> Result<Vec<AuditDocument>, AuditStoreError>;
}
