//! The route event shape carried in-memory and on the wire, and the
//! endpoint state it snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::route_identifier::RouteIdentifier;

/// The mutation that produced a [`RouteEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RouteAction {
    Created,
    Activated,
    Deactivated,
}

impl RouteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Activated => "activated",
            Self::Deactivated => "deactivated",
        }
    }
}

/// Whether an endpoint was active or inactive, for event `previous_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EndpointState {
    Active,
    Inactive,
}

/// An event describing a committed route mutation.
///
/// Published to the event log after commit, and the payload persisted (with
/// `processed_at` and `metadata` added) as the audit document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct RouteEvent {
    pub event_id: Uuid,
    #[serde(rename = "event_type")]
    pub event_type: &'static str,
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
    pub correlation_id: String,
}

impl RouteEvent {
    /// Build a new event for a just-committed mutation.
    #[allow(clippy::too_many_arguments, reason = "mirrors the wire schema exactly")]
    pub fn new(
        action: RouteAction,
        identifier: &RouteIdentifier,
        url: impl Into<String>,
        previous_url: Option<String>,
        previous_state: Option<EndpointState>,
        changed_by: Option<String>,
        occurred_at: DateTime<Utc>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: "route_changed",
            action,
            tenant: identifier.tenant().to_owned(),
            service: identifier.service().to_owned(),
            env: identifier.env().to_owned(),
            version: identifier.version().to_owned(),
            url: url.into(),
            previous_url,
            previous_state,
            changed_by,
            occurred_at,
            correlation_id: correlation_id.into(),
        }
    }

    /// Reconstruct the route identifier this event concerns.
    pub fn identifier(&self) -> Result<RouteIdentifier, crate::domain::Error> {
        RouteIdentifier::new(
            self.tenant.clone(),
            self.service.clone(),
            self.env.clone(),
            self.version.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_expected_field_names() {
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
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event_type"], "route_changed");
        assert_eq!(json["action"], "created");
        assert_eq!(json["tenant"], "team-a");
    }

    #[test]
    fn round_trips_identifier() {
        let id = RouteIdentifier::new("team-a", "payments", "prod", "v2").expect("valid");
        let event = RouteEvent::new(
            RouteAction::Activated,
            &id,
            "https://p/v2",
            None,
            Some(EndpointState::Inactive),
            None,
            Utc::now(),
            "corr-1",
        );
        assert_eq!(event.identifier().expect("valid"), id);
    }
}
