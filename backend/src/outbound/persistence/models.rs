//! Internal Diesel row structs for the persistence layer.
//!
//! These are implementation details; the domain never sees them directly.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{audit_documents, endpoints, environments, services, tenants};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TenantRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tenants)]
pub(crate) struct NewTenantRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = services)]
pub(crate) struct NewServiceRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = environments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnvironmentRow {
    pub id: Uuid,
    pub service_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = environments)]
pub(crate) struct NewEnvironmentRow<'a> {
    pub id: Uuid,
    pub service_id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = endpoints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EndpointRow {
    pub id: Uuid,
    pub environment_id: Uuid,
    pub version: String,
    pub url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = endpoints)]
pub(crate) struct NewEndpointRow<'a> {
    pub id: Uuid,
    pub environment_id: Uuid,
    pub version: &'a str,
    pub url: &'a str,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = endpoints)]
pub(crate) struct EndpointActiveUpdate {
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuditDocumentRow {
    #[expect(dead_code, reason = "surrogate key, never read back by the adapter")]
    pub id: Uuid,
    pub event_id: Uuid,
    pub action: String,
    pub tenant: String,
    pub service: String,
    pub env: String,
    pub version: String,
    pub url: String,
    pub previous_url: Option<String>,
    pub previous_state: Option<String>,
    pub changed_by: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub correlation_id: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_documents)]
pub(crate) struct NewAuditDocumentRow<'a> {
    pub id: Uuid,
    pub event_id: Uuid,
    pub action: &'a str,
    pub tenant: &'a str,
    pub service: &'a str,
    pub env: &'a str,
    pub version: &'a str,
    pub url: &'a str,
    pub previous_url: Option<&'a str>,
    pub previous_state: Option<&'a str>,
    pub changed_by: Option<&'a str>,
    pub occurred_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub correlation_id: &'a str,
    pub metadata: &'a Value,
}
