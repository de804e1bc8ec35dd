//! PostgreSQL-backed `AuditStore`: append-only, deduplicated on `event_id`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::audit::{AuditDocument, AuditQueryFilter};
use crate::domain::ports::{AuditStore, AuditStoreError};
use crate::domain::route_event::{EndpointState, RouteAction};

use super::diesel_error::pool_error_message;
use super::models::{AuditDocumentRow, NewAuditDocumentRow};
use super::pool::DbPool;
use super::schema::audit_documents;

/// Diesel-backed implementation of the audit store port.
#[derive(Clone)]
pub struct DieselAuditStore {
    pool: DbPool,
}

impl DieselAuditStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: super::pool::PoolError) -> AuditStoreError {
    AuditStoreError::connection(pool_error_message(error))
}

fn action_to_str(action: RouteAction) -> &'static str {
    action.as_str()
}

fn action_from_str(value: &str) -> RouteAction {
    match value {
        "activated" => RouteAction::Activated,
        "deactivated" => RouteAction::Deactivated,
        _ => RouteAction::Created,
    }
}

fn state_to_str(state: EndpointState) -> &'static str {
    match state {
        EndpointState::Active => "active",
        EndpointState::Inactive => "inactive",
    }
}

fn state_from_str(value: &str) -> EndpointState {
    match value {
        "active" => EndpointState::Active,
        _ => EndpointState::Inactive,
    }
}

fn row_to_document(row: AuditDocumentRow) -> AuditDocument {
    AuditDocument {
        event_id: row.event_id,
        action: action_from_str(&row.action),
        tenant: row.tenant,
        service: row.service,
        env: row.env,
        version: row.version,
        url: row.url,
        previous_url: row.previous_url,
        previous_state: row.previous_state.as_deref().map(state_from_str),
        changed_by: row.changed_by,
        occurred_at: row.occurred_at,
        processed_at: row.processed_at,
        correlation_id: row.correlation_id,
        metadata: row.metadata,
    }
}

#[async_trait]
impl AuditStore for DieselAuditStore {
    async fn record(&self, document: &AuditDocument) -> Result<(), AuditStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let action = action_to_str(document.action);
        let previous_state = document.previous_state.map(state_to_str);

        diesel::insert_into(audit_documents::table)
            .values(NewAuditDocumentRow {
                id: Uuid::new_v4(),
                event_id: document.event_id,
                action,
                tenant: &document.tenant,
                service: &document.service,
                env: &document.env,
                version: &document.version,
                url: &document.url,
                previous_url: document.previous_url.as_deref(),
                previous_state,
                changed_by: document.changed_by.as_deref(),
                occurred_at: document.occurred_at,
                processed_at: document.processed_at,
                correlation_id: &document.correlation_id,
                metadata: &document.metadata,
            })
            .on_conflict(audit_documents::event_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| AuditStoreError::write(err.to_string()))?;

        Ok(())
    }

    async fn query(&self, filter: &AuditQueryFilter) -> Result<Vec<AuditDocument>, AuditStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = audit_documents::table.into_boxed();
        if let Some(tenant) = &filter.tenant {
            query = query.filter(audit_documents::tenant.eq(tenant.clone()));
        }
        if let Some(service) = &filter.service {
            query = query.filter(audit_documents::service.eq(service.clone()));
        }
        if let Some(env) = &filter.env {
            query = query.filter(audit_documents::env.eq(env.clone()));
        }
        if let Some(version) = &filter.version {
            query = query.filter(audit_documents::version.eq(version.clone()));
        }
        if let Some(action) = filter.action {
            query = query.filter(audit_documents::action.eq(action_to_str(action)));
        }
        if let Some(since) = filter.since {
            query = query.filter(audit_documents::occurred_at.ge(since));
        }
        if let Some(until) = filter.until {
            query = query.filter(audit_documents::occurred_at.le(until));
        }

        let rows: Vec<AuditDocumentRow> = query
            .order_by(audit_documents::occurred_at.desc())
            .limit(i64::from(filter.clamped_limit()))
            .select(AuditDocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| AuditStoreError::connection(err.to_string()))?;

        Ok(rows.into_iter().map(row_to_document).collect())
    }
}
