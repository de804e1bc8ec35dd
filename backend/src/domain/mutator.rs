//! The write path: idempotent, transactional create/activate/deactivate
//! plus post-commit best-effort event emission.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use super::error::Error;
use super::ports::{CreateOutcome, EventLog, RecordStore, ToggleOutcome};
use super::resilience::{AdapterResilience, Bulkhead, Drainer};
use super::route_event::{EndpointState, RouteAction, RouteEvent};
use super::route_identifier::{validate_url, RouteIdentifier};

/// Outcome of [`Mutator::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateResult {
    Created,
    AlreadyExists,
}

/// Outcome of [`Mutator::activate`] / [`Mutator::deactivate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResult {
    Activated,
    AlreadyActive,
    Deactivated,
    AlreadyInactive,
}

/// The transactional mutator implementing `spec.md` §4.2.
pub struct Mutator {
    record_store: Arc<dyn RecordStore>,
    event_log: Arc<dyn EventLog>,
    record_store_resilience: Arc<AdapterResilience>,
    event_log_resilience: Arc<AdapterResilience>,
    drainer: Arc<Drainer>,
    bulkhead: Arc<Bulkhead>,
    clock: Arc<dyn Clock>,
}

impl Mutator {
    #[allow(clippy::too_many_arguments, reason = "explicit adapter wiring, no builder needed at this call count")]
    pub fn new(
        record_store: Arc<dyn RecordStore>,
        event_log: Arc<dyn EventLog>,
        record_store_resilience: Arc<AdapterResilience>,
        event_log_resilience: Arc<AdapterResilience>,
        drainer: Arc<Drainer>,
        bulkhead: Arc<Bulkhead>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            record_store,
            event_log,
            record_store_resilience,
            event_log_resilience,
            drainer,
            bulkhead,
            clock,
        }
    }

    /// `create(identifier, url) -> {created|already_exists}`.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::Validation`] for a malformed
    /// identifier or empty URL, [`crate::domain::ErrorCode::Conflict`] if an
    /// endpoint already exists with a different URL, or
    /// [`crate::domain::ErrorCode::ServiceUnavailable`] on a record store
    /// outage.
    pub async fn create(
        &self,
        identifier: &RouteIdentifier,
        url: &str,
        changed_by: Option<String>,
        correlation_id: &str,
    ) -> Result<CreateResult, Error> {
        validate_url(url)?;

        let record_store = Arc::clone(&self.record_store);
        let id = identifier.clone();
        let url_owned = url.to_owned();
        let outcome = self
            .record_store_resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let record_store = Arc::clone(&record_store);
                let id = id.clone();
                let url = url_owned.clone();
                async move {
                    record_store
                        .create_endpoint(&id, &url)
                        .await
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await?;

        match outcome {
            CreateOutcome::Created(record) => {
                self.emit_best_effort(
                    RouteAction::Created,
                    identifier,
                    &record.url,
                    None,
                    None,
                    changed_by,
                    correlation_id,
                )
                .await;
                Ok(CreateResult::Created)
            }
            CreateOutcome::AlreadyExists(_) => Ok(CreateResult::AlreadyExists),
            CreateOutcome::Conflict { existing_url } => Err(Error::conflict(format!(
                "endpoint already exists for {identifier} with url {existing_url}"
            ))),
        }
    }

    /// `activate(identifier) -> {activated|already_active|not_found}`.
    pub async fn activate(
        &self,
        identifier: &RouteIdentifier,
        changed_by: Option<String>,
        correlation_id: &str,
    ) -> Result<ToggleResult, Error> {
        let record_store = Arc::clone(&self.record_store);
        let id = identifier.clone();
        let outcome = self
            .record_store_resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let record_store = Arc::clone(&record_store);
                let id = id.clone();
                async move {
                    record_store
                        .activate_endpoint(&id)
                        .await
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await?;

        self.handle_toggle_outcome(
            outcome,
            RouteAction::Activated,
            identifier,
            changed_by,
            correlation_id,
            ToggleResult::Activated,
            ToggleResult::AlreadyActive,
        )
        .await
    }

    /// `deactivate(identifier) -> {deactivated|already_inactive|not_found}`.
    pub async fn deactivate(
        &self,
        identifier: &RouteIdentifier,
        changed_by: Option<String>,
        correlation_id: &str,
    ) -> Result<ToggleResult, Error> {
        let record_store = Arc::clone(&self.record_store);
        let id = identifier.clone();
        let outcome = self
            .record_store_resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let record_store = Arc::clone(&record_store);
                let id = id.clone();
                async move {
                    record_store
                        .deactivate_endpoint(&id)
                        .await
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await?;

        self.handle_toggle_outcome(
            outcome,
            RouteAction::Deactivated,
            identifier,
            changed_by,
            correlation_id,
            ToggleResult::Deactivated,
            ToggleResult::AlreadyInactive,
        )
        .await
    }

    #[allow(clippy::too_many_arguments, reason = "shared outcome handling for activate/deactivate")]
    async fn handle_toggle_outcome(
        &self,
        outcome: ToggleOutcome,
        action: RouteAction,
        identifier: &RouteIdentifier,
        changed_by: Option<String>,
        correlation_id: &str,
        applied_result: ToggleResult,
        already_result: ToggleResult,
    ) -> Result<ToggleResult, Error> {
        match outcome {
            ToggleOutcome::Applied {
                record,
                previous_active,
            } => {
                let previous_state = Some(if previous_active {
                    EndpointState::Active
                } else {
                    EndpointState::Inactive
                });
                self.emit_best_effort(
                    action,
                    identifier,
                    &record.url,
                    Some(record.url.clone()),
                    previous_state,
                    changed_by,
                    correlation_id,
                )
                .await;
                Ok(applied_result)
            }
            ToggleOutcome::AlreadyInState(_) => Ok(already_result),
            ToggleOutcome::NotFound => Err(Error::not_found(format!(
                "no endpoint exists for {identifier}"
            ))),
        }
    }

    /// Publish the route event after commit. Never fails the write: failure
    /// is logged, per `spec.md` §4.2 step 6.
    #[allow(clippy::too_many_arguments, reason = "mirrors the event wire schema")]
    async fn emit_best_effort(
        &self,
        action: RouteAction,
        identifier: &RouteIdentifier,
        url: &str,
        previous_url: Option<String>,
        previous_state: Option<EndpointState>,
        changed_by: Option<String>,
        correlation_id: &str,
    ) {
        let event = RouteEvent::new(
            action,
            identifier,
            url,
            previous_url,
            previous_state,
            changed_by,
            self.clock.utc(),
            correlation_id,
        );

        let event_log = Arc::clone(&self.event_log);
        let publish_event = event.clone();
        let result: Result<(), Error> = self
            .event_log_resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let event_log = Arc::clone(&event_log);
                let event = publish_event.clone();
                async move {
                    event_log
                        .publish(&event)
                        .await
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await;

        if let Err(error) = result {
            warn!(
                event_id = %event.event_id,
                route = %identifier,
                %error,
                "post-commit event publish failed; write already committed successfully"
            );
        }
    }
}
