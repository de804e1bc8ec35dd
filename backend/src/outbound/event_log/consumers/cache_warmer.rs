//! Writes the positive cache entry for `created`/`activated` events with a
//! non-empty URL; deletes on `deactivated` (same effect as the invalidator —
//! the race between the two is benign, per `spec.md` §4.4).

use std::sync::Arc;

use crate::domain::ports::{Cache, DEFAULT_POSITIVE_TTL};
use crate::domain::route_event::{RouteAction, RouteEvent};

use super::EventHandler;

pub struct CacheWarmer {
    cache: Arc<dyn Cache>,
}

impl CacheWarmer {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }
}

#[async_trait::async_trait]
impl EventHandler for CacheWarmer {
    fn name(&self) -> &'static str {
        "cache-warmer"
    }

    async fn handle(&self, event: &RouteEvent) -> Result<(), String> {
        let identifier = event.identifier().map_err(|err| err.to_string())?;
        let key = identifier.cache_key();

        match event.action {
            RouteAction::Created | RouteAction::Activated if !event.url.is_empty() => self
                .cache
                .put_url(&key, &event.url, DEFAULT_POSITIVE_TTL)
                .await
                .map_err(|err| err.to_string()),
            RouteAction::Deactivated => self
                .cache
                .delete(&key)
                .await
                .map_err(|err| err.to_string()),
            _ => Ok(()),
        }
    }
}
