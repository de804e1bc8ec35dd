//! The audit document persisted by the Audit Writer consumer: a superset of
//! a [`RouteEvent`] plus `processed_at` and free-form metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::route_event::{EndpointState, RouteAction, RouteEvent};

/// A persisted audit record, deduplicated on `event_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct AuditDocument {
    pub event_id: Uuid,
    pub action: RouteAction,
    pub tenant: String,
    pub service: String,
    pub env: String,
    pub version: String,
    pub url: String,
    pub previous_url: Option<String>,
    pub previous_state: Option<EndpointState>,
    pub changed_by: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub correlation_id: String,
    pub metadata: Value,
}

impl AuditDocument {
    /// Build the audit document for an event, stamping `processed_at` as now.
    pub fn from_event(event: &RouteEvent, processed_at: DateTime<Utc>) -> Self {
        Self {
            event_id: event.event_id,
            action: event.action,
            tenant: event.tenant.clone(),
            service: event.service.clone(),
            env: event.env.clone(),
            version: event.version.clone(),
            url: event.url.clone(),
            previous_url: event.previous_url.clone(),
            previous_state: event.previous_state,
            changed_by: event.changed_by.clone(),
            occurred_at: event.occurred_at,
            processed_at,
            correlation_id: event.correlation_id.clone(),
            metadata: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Filters accepted by `AuditQuery`: identifier and/or time range and/or
/// action, with a bounded result size.
#[derive(Debug, Clone, Default)]
pub struct AuditQueryFilter {
    pub tenant: Option<String>,
    pub service: Option<String>,
    pub env: Option<String>,
    pub version: Option<String>,
    pub action: Option<RouteAction>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: u32,
}

impl AuditQueryFilter {
    /// The maximum `limit` the boundary operation accepts.
    pub const MAX_LIMIT: u32 = 1000;

    /// Clamp `limit` to `(0, MAX_LIMIT]`, defaulting to `MAX_LIMIT` when zero.
    pub fn clamped_limit(&self) -> u32 {
        if self.limit == 0 {
            Self::MAX_LIMIT
        } else {
            self.limit.min(Self::MAX_LIMIT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route_identifier::RouteIdentifier;

    #[test]
    fn builds_from_event() {
        let id = RouteIdentifier::new("team-a", "payments", "prod", "v2").expect("valid");
        let event = RouteEvent::new(
            RouteAction::Created,
            &id,
            "https://p/v2",
            None,
            None,
            None,
            Utc::now(),
            "corr-1",
        );
        let now = Utc::now();
        let doc = AuditDocument::from_event(&event, now);
        assert_eq!(doc.event_id, event.event_id);
        assert_eq!(doc.processed_at, now);
    }

    #[test]
    fn clamps_limit() {
        let mut filter = AuditQueryFilter::default();
        assert_eq!(filter.clamped_limit(), AuditQueryFilter::MAX_LIMIT);
        filter.limit = 10_000;
        assert_eq!(filter.clamped_limit(), AuditQueryFilter::MAX_LIMIT);
        filter.limit = 5;
        assert_eq!(filter.clamped_limit(), 5);
    }
}
