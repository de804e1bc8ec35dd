//! Deletes the cache entry for every event. Idempotent by construction.

use std::sync::Arc;

use crate::domain::ports::Cache;
use crate::domain::route_event::RouteEvent;

use super::EventHandler;

pub struct CacheInvalidator {
    cache: Arc<dyn Cache>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl EventHandler for CacheInvalidator {
    fn name(&self) -> &'static str {
        "cache-invalidator"
    }

    async fn handle(&self, event: &RouteEvent) -> Result<(), String> {
        let identifier = event.identifier().map_err(|err| err.to_string())?;
        self.cache
            .delete(&identifier.cache_key())
            .await
            .map_err(|err| err.to_string())
    }
}
