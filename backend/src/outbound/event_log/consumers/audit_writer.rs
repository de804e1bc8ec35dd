//! Persists every event as an audit document, deduplicated on `event_id`.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::audit::AuditDocument;
use crate::domain::ports::AuditStore;
use crate::domain::route_event::RouteEvent;

use super::EventHandler;

pub struct AuditWriter {
    audit_store: Arc<dyn AuditStore>,
    clock: Arc<dyn Clock>,
}

impl AuditWriter {
    pub fn new(audit_store: Arc<dyn AuditStore>, clock: Arc<dyn Clock>) -> Self {
        Self { audit_store, clock }
    }
}

#[async_trait::async_trait]
impl EventHandler for AuditWriter {
    fn name(&self) -> &'static str {
        "audit-writer"
    }

    async fn handle(&self, event: &RouteEvent) -> Result<(), String> {
        let document = AuditDocument::from_event(event, self.clock.utc());
        self.audit_store
            .record(&document)
            .await
            .map_err(|err| err.to_string())
    }
}
