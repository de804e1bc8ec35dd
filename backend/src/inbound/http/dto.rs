//! Request/response bodies for the HTTP boundary operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::audit::AuditDocument;
use crate::domain::route_event::RouteAction;

/// Path parameters shared by every route-scoped operation.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutePath {
    pub tenant: String,
    pub service: String,
    pub env: String,
    pub version: String,
}

/// Body of `POST /routes` (`CreateRoute`).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRouteRequest {
    pub url: String,
    #[serde(default)]
    pub changed_by: Option<String>,
}

/// Body of `POST /routes/{..}/activate` and `/deactivate`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ToggleRouteRequest {
    #[serde(default)]
    pub changed_by: Option<String>,
}

/// Response of `GET /routes/{..}` (`ResolveRoute`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolveRouteResponse {
    pub url: String,
}

/// Response of `POST /routes` (`CreateRoute`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRouteResponse {
    pub created: bool,
}

/// Response of the activate/deactivate operations.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleRouteResponse {
    pub active: bool,
    pub changed: bool,
}

/// Query parameters for `GET /audit` (`AuditQuery`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQueryParams {
    pub tenant: Option<String>,
    pub service: Option<String>,
    pub env: Option<String>,
    pub version: Option<String>,
    pub action: Option<RouteAction>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: u32,
}

/// A single audit document as returned by `AuditQuery`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditDocumentResponse {
    pub event_id: Uuid,
    pub action: RouteAction,
    pub tenant: String,
    pub service: String,
    pub env: String,
    pub version: String,
    pub url: String,
    pub previous_url: Option<String>,
    pub changed_by: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub correlation_id: String,
}

impl From<AuditDocument> for AuditDocumentResponse {
    fn from(doc: AuditDocument) -> Self {
        Self {
            event_id: doc.event_id,
            action: doc.action,
            tenant: doc.tenant,
            service: doc.service,
            env: doc.env,
            version: doc.version,
            url: doc.url,
            previous_url: doc.previous_url,
            changed_by: doc.changed_by,
            occurred_at: doc.occurred_at,
            processed_at: doc.processed_at,
            correlation_id: doc.correlation_id,
        }
    }
}

/// Response of `GET /health/ready`: overall status plus per-adapter detail.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub adapters: Vec<AdapterStatus>,
}

/// A single adapter's resilience status, surfaced for operators.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdapterStatus {
    pub name: String,
    pub circuit_breaker: String,
}

/// Response of `GET /health/live`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LivenessResponse {
    pub alive: bool,
}
