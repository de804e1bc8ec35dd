//! The `AuditQuery` boundary operation: a thin, resilience-wrapped read over
//! the [`AuditStore`] port (`spec.md` §6).

use std::sync::Arc;

use mockable::Clock;

use super::audit::{AuditDocument, AuditQueryFilter};
use super::error::Error;
use super::ports::AuditStore;
use super::resilience::{AdapterResilience, Bulkhead, Drainer};

/// Queries persisted audit documents through the resilience envelope.
pub struct AuditQuery {
    audit_store: Arc<dyn AuditStore>,
    resilience: Arc<AdapterResilience>,
    drainer: Arc<Drainer>,
    bulkhead: Arc<Bulkhead>,
    clock: Arc<dyn Clock>,
}

impl AuditQuery {
    pub fn new(
        audit_store: Arc<dyn AuditStore>,
        resilience: Arc<AdapterResilience>,
        drainer: Arc<Drainer>,
        bulkhead: Arc<Bulkhead>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            audit_store,
            resilience,
            drainer,
            bulkhead,
            clock,
        }
    }

    /// Run the query, newest-first, bounded by `filter.clamped_limit()`.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::ServiceUnavailable`] on audit
    /// store outage.
    pub async fn query(&self, filter: &AuditQueryFilter) -> Result<Vec<AuditDocument>, Error> {
        let audit_store = Arc::clone(&self.audit_store);
        let filter = filter.clone();
        self.resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let audit_store = Arc::clone(&audit_store);
                let filter = filter.clone();
                async move {
                    audit_store
                        .query(&filter)
                        .await
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await
    }
}
