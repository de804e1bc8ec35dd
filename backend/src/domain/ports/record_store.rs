//! Port for the transactional system of record: tenants, services,
//! environments, and endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::route_identifier::RouteIdentifier;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the record store adapter.
    pub enum RecordStoreError {
        /// Database connectivity, pool checkout, or transaction failures.
        Connection { message: String } => "record store connection failed: {message}",
        /// Catch-all for unclassified adapter failures.
        Fatal { message: String } => "record store operation failed: {message}",
    }
}

/// A single endpoint row as read back from the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRecord {
    pub identifier: RouteIdentifier,
    pub url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of `create_endpoint`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A new row was inserted.
    Created(EndpointRecord),
    /// A row already existed with the same URL; treated as idempotent
    /// success.
    AlreadyExists(EndpointRecord),
    /// A row already existed with a different URL.
    Conflict { existing_url: String },
}

/// Outcome of `activate_endpoint` / `deactivate_endpoint`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The row transitioned to the requested state.
    Applied {
        record: EndpointRecord,
        previous_active: bool,
    },
    /// The row was already in the requested state.
    AlreadyInState(EndpointRecord),
    /// No row exists for the identifier.
    NotFound,
}

/// Transactional CRUD over the normalized route schema.
///
/// Implementations own get-or-insert of parent rows (tenant/service/
/// environment) as part of each mutation, per `spec.md` §4.2 step 3.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Idempotently create (or confirm) an endpoint.
    async fn create_endpoint(
        &self,
        identifier: &RouteIdentifier,
        url: &str,
    ) -> Result<CreateOutcome, RecordStoreError>;

    /// Set `is_active = true`.
    async fn activate_endpoint(
        &self,
        identifier: &RouteIdentifier,
    ) -> Result<ToggleOutcome, RecordStoreError>;

    /// Set `is_active = false`.
    async fn deactivate_endpoint(
        &self,
        identifier: &RouteIdentifier,
    ) -> Result<ToggleOutcome, RecordStoreError>;

    /// Fetch the single active endpoint for an identifier, if any.
    async fn find_active_endpoint(
        &self,
        identifier: &RouteIdentifier,
    ) -> Result<Option<EndpointRecord>, RecordStoreError>;
}
