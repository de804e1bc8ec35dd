//! Hand-rolled recording test doubles for the domain ports, used by HTTP-level
//! integration tests instead of the crate's internal `mockall` mocks (which
//! are `pub(crate)` and not visible from a separate integration-test crate).

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use backend::domain::audit::{AuditDocument, AuditQueryFilter};
use backend::domain::ports::{
    AuditStore, AuditStoreError, Cache, CacheError, CacheValue, CreateOutcome, EndpointRecord,
    EventLog, EventLogError, RecordStore, RecordStoreError, ToggleOutcome,
};
use backend::domain::route_event::RouteEvent;
use backend::domain::RouteIdentifier;

/// A [`RecordStore`] double whose responses are set by the scenario and whose
/// calls are recorded for later assertions.
#[derive(Default)]
pub struct RecordingRecordStore {
    create_response: Mutex<Option<Result<CreateOutcome, RecordStoreError>>>,
    toggle_response: Mutex<Option<Result<ToggleOutcome, RecordStoreError>>>,
    find_response: Mutex<Option<Result<Option<EndpointRecord>, RecordStoreError>>>,
    pub create_calls: Mutex<Vec<(RouteIdentifier, String)>>,
}

impl RecordingRecordStore {
    pub fn set_create_response(&self, response: Result<CreateOutcome, RecordStoreError>) {
        *self.create_response.lock().expect("lock") = Some(response);
    }

    pub fn set_toggle_response(&self, response: Result<ToggleOutcome, RecordStoreError>) {
        *self.toggle_response.lock().expect("lock") = Some(response);
    }

    pub fn set_find_response(&self, response: Result<Option<EndpointRecord>, RecordStoreError>) {
        *self.find_response.lock().expect("lock") = Some(response);
    }
}

#[async_trait]
impl RecordStore for RecordingRecordStore {
    async fn create_endpoint(
        &self,
        identifier: &RouteIdentifier,
        url: &str,
    ) -> Result<CreateOutcome, RecordStoreError> {
        self.create_calls
            .lock()
            .expect("lock")
            .push((identifier.clone(), url.to_owned()));
        self.create_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(RecordStoreError::fatal("no response configured")))
    }

    async fn activate_endpoint(
        &self,
        _identifier: &RouteIdentifier,
    ) -> Result<ToggleOutcome, RecordStoreError> {
        self.toggle_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(RecordStoreError::fatal("no response configured")))
    }

    async fn deactivate_endpoint(
        &self,
        _identifier: &RouteIdentifier,
    ) -> Result<ToggleOutcome, RecordStoreError> {
        self.toggle_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(RecordStoreError::fatal("no response configured")))
    }

    async fn find_active_endpoint(
        &self,
        _identifier: &RouteIdentifier,
    ) -> Result<Option<EndpointRecord>, RecordStoreError> {
        self.find_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(RecordStoreError::fatal("no response configured")))
    }
}

/// A [`Cache`] double that always misses unless primed, used so resolver
/// tests exercise the record-store fallthrough path deterministically.
#[derive(Default)]
pub struct RecordingCache {
    get_response: Mutex<Option<Result<Option<CacheValue>, CacheError>>>,
    pub put_url_calls: Mutex<Vec<(String, String)>>,
}

impl RecordingCache {
    pub fn set_get_response(&self, response: Result<Option<CacheValue>, CacheError>) {
        *self.get_response.lock().expect("lock") = Some(response);
    }
}

#[async_trait]
impl Cache for RecordingCache {
    async fn get(&self, _key: &str) -> Result<Option<CacheValue>, CacheError> {
        self.get_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or(Ok(None))
    }

    async fn put_url(&self, key: &str, url: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.put_url_calls
            .lock()
            .expect("lock")
            .push((key.to_owned(), url.to_owned()));
        Ok(())
    }

    async fn put_not_found(&self, _key: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

/// An [`EventLog`] double that records every published event and can be
/// primed to fail, to exercise the Mutator's best-effort publish path.
#[derive(Default)]
pub struct RecordingEventLog {
    publish_response: Mutex<Option<Result<(), EventLogError>>>,
    pub published: Mutex<Vec<RouteEvent>>,
}

impl RecordingEventLog {
    pub fn set_publish_response(&self, response: Result<(), EventLogError>) {
        *self.publish_response.lock().expect("lock") = Some(response);
    }
}

#[async_trait]
impl EventLog for RecordingEventLog {
    async fn publish(&self, event: &RouteEvent) -> Result<(), EventLogError> {
        self.published.lock().expect("lock").push(event.clone());
        self.publish_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or(Ok(()))
    }
}

/// An [`AuditStore`] double returning a fixed page of documents.
#[derive(Default)]
pub struct RecordingAuditStore {
    query_response: Mutex<Option<Result<Vec<AuditDocument>, AuditStoreError>>>,
}

impl RecordingAuditStore {
    pub fn set_query_response(&self, response: Result<Vec<AuditDocument>, AuditStoreError>) {
        *self.query_response.lock().expect("lock") = Some(response);
    }
}

#[async_trait]
impl AuditStore for RecordingAuditStore {
    async fn record(&self, _document: &AuditDocument) -> Result<(), AuditStoreError> {
        Ok(())
    }

    async fn query(
        &self,
        _filter: &AuditQueryFilter,
    ) -> Result<Vec<AuditDocument>, AuditStoreError> {
        self.query_response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or(Ok(Vec::new()))
    }
}
