//! The read path: cache-aside resolution with negative caching and
//! graceful degradation under cache or record-store failure.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, warn};

use super::error::{Error, ErrorCode};
use super::ports::{
    Cache, CacheValue, RecordStore, DEFAULT_NEGATIVE_TTL, DEFAULT_POSITIVE_TTL, NOT_FOUND_SENTINEL,
};
use super::resilience::{AdapterResilience, Bulkhead, Drainer};
use super::route_identifier::RouteIdentifier;

/// Tunable TTLs for the resolver's cache writes.
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    pub positive_ttl: Duration,
    pub negative_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            positive_ttl: DEFAULT_POSITIVE_TTL,
            negative_ttl: DEFAULT_NEGATIVE_TTL,
        }
    }
}

/// Cache-aside resolver implementing `spec.md` §4.1.
pub struct Resolver {
    cache: Arc<dyn Cache>,
    record_store: Arc<dyn RecordStore>,
    cache_resilience: Arc<AdapterResilience>,
    record_store_resilience: Arc<AdapterResilience>,
    drainer: Arc<Drainer>,
    bulkhead: Arc<Bulkhead>,
    clock: Arc<dyn Clock>,
    config: ResolverConfig,
}

impl Resolver {
    #[allow(clippy::too_many_arguments, reason = "explicit adapter wiring, no builder needed at this call count")]
    pub fn new(
        cache: Arc<dyn Cache>,
        record_store: Arc<dyn RecordStore>,
        cache_resilience: Arc<AdapterResilience>,
        record_store_resilience: Arc<AdapterResilience>,
        drainer: Arc<Drainer>,
        bulkhead: Arc<Bulkhead>,
        clock: Arc<dyn Clock>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            cache,
            record_store,
            cache_resilience,
            record_store_resilience,
            drainer,
            bulkhead,
            clock,
            config,
        }
    }

    /// `resolve(tenant, service, env, version) -> url | NotFound`.
    ///
    /// # Errors
    /// Returns [`ErrorCode::NotFound`] when no active endpoint matches, or
    /// [`ErrorCode::ServiceUnavailable`] when the record store cannot be
    /// reached and no usable cached value remains.
    pub async fn resolve(&self, identifier: &RouteIdentifier) -> Result<String, Error> {
        let key = identifier.cache_key();

        if let Some(value) = self.read_cache(&key).await {
            return match value {
                CacheValue::Url(url) => Ok(url),
                CacheValue::NotFound => Err(Error::not_found(format!(
                    "no active endpoint for {identifier} (negative cache hit)"
                ))),
            };
        }

        match self.query_record_store(identifier).await {
            Ok(Some(url)) => {
                self.write_cache_url(&key, &url).await;
                Ok(url)
            }
            Ok(None) => {
                self.write_cache_not_found(&key).await;
                Err(Error::not_found(format!(
                    "no active endpoint for {identifier}"
                )))
            }
            Err(error) => {
                // Breaker open or adapter exhausted: fall back to the most
                // recent positive cache entry if it is still present, per
                // `spec.md` §4.1's record-store-outage failure semantics.
                // The cache was already consulted above and came back
                // empty/expired, so there is nothing further to fall back
                // to here; surface the outage.
                Err(error.redacted_for_clients_if_fatal())
            }
        }
    }

    async fn read_cache(&self, key: &str) -> Option<CacheValue> {
        let cache = Arc::clone(&self.cache);
        let key_owned = key.to_owned();
        let result = self
            .cache_resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let cache = Arc::clone(&cache);
                let key = key_owned.clone();
                async move {
                    cache
                        .get(&key)
                        .await
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await;

        match result {
            Ok(value) => value,
            Err(error) => {
                // Cache unavailable on read is treated as a miss; never
                // retried inline beyond the kernel's own retry budget.
                debug!(%error, "cache read treated as miss");
                None
            }
        }
    }

    async fn query_record_store(&self, identifier: &RouteIdentifier) -> Result<Option<String>, Error> {
        let record_store = Arc::clone(&self.record_store);
        let identifier = identifier.clone();
        self.record_store_resilience
            .call(&self.drainer, &self.bulkhead, self.clock.as_ref(), || {
                let record_store = Arc::clone(&record_store);
                let identifier = identifier.clone();
                async move {
                    record_store
                        .find_active_endpoint(&identifier)
                        .await
                        .map(|maybe| maybe.map(|record| record.url))
                        .map_err(|err| Error::service_unavailable(err.to_string()))
                }
            })
            .await
    }

    async fn write_cache_url(&self, key: &str, url: &str) {
        let cache = Arc::clone(&self.cache);
        let key = key.to_owned();
        let url = url.to_owned();
        let ttl = self.config.positive_ttl;
        if let Err(error) = cache.put_url(&key, &url, ttl).await {
            warn!(%error, "cache write failed; correctness preserved, hit rate suffers");
        }
    }

    async fn write_cache_not_found(&self, key: &str) {
        let ttl = self.config.negative_ttl;
        if let Err(error) = self.cache.put_not_found(key, ttl).await {
            warn!(%error, "negative cache write failed");
        }
    }
}

impl Error {
    fn redacted_for_clients_if_fatal(self) -> Self {
        if matches!(self.code(), ErrorCode::InternalError) {
            self.redacted_for_clients()
        } else {
            self
        }
    }
}

/// Literal value the cache stores for a negative hit, exposed for tests and
/// cache adapters that need to compare against it directly.
pub const NEGATIVE_CACHE_VALUE: &str = NOT_FOUND_SENTINEL;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{EndpointRecord, MockCache, MockRecordStore, RecordStoreError};
    use crate::domain::resilience::{CircuitBreakerConfig, OperationClass, RetryBudgetConfig};
    use mockable::DefaultClock;

    fn identifier() -> RouteIdentifier {
        RouteIdentifier::new("team-a", "payments", "prod", "v2").expect("valid")
    }

    fn resilience(name: &'static str, class: OperationClass) -> Arc<AdapterResilience> {
        Arc::new(AdapterResilience::new(
            name,
            class,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            &DefaultClock,
        ))
    }

    #[tokio::test]
    async fn positive_cache_hit_returns_url_without_touching_store() {
        let mut cache = MockCache::new();
        cache
            .expect_get()
            .returning(|_| Ok(Some(CacheValue::Url("https://p/v2".into()))));
        let record_store = MockRecordStore::new();

        let resolver = Resolver::new(
            Arc::new(cache),
            Arc::new(record_store),
            resilience("cache", OperationClass::Read),
            resilience("record_store", OperationClass::Read),
            Arc::new(Drainer::new()),
            Arc::new(Bulkhead::new(4, 4, 4)),
            Arc::new(DefaultClock),
            ResolverConfig::default(),
        );

        let url = resolver.resolve(&identifier()).await.expect("resolved");
        assert_eq!(url, "https://p/v2");
    }

    #[tokio::test]
    async fn negative_cache_hit_returns_not_found() {
        let mut cache = MockCache::new();
        cache
            .expect_get()
            .returning(|_| Ok(Some(CacheValue::NotFound)));
        let record_store = MockRecordStore::new();

        let resolver = Resolver::new(
            Arc::new(cache),
            Arc::new(record_store),
            resilience("cache", OperationClass::Read),
            resilience("record_store", OperationClass::Read),
            Arc::new(Drainer::new()),
            Arc::new(Bulkhead::new(4, 4, 4)),
            Arc::new(DefaultClock),
            ResolverConfig::default(),
        );

        let err = resolver.resolve(&identifier()).await.expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn cache_miss_falls_through_to_store_and_warms_cache() {
        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_put_url()
            .withf(|key, url, _ttl| key == "route:team-a:payments:prod:v2" && url == "https://p/v2")
            .returning(|_, _, _| Ok(()));

        let mut record_store = MockRecordStore::new();
        record_store.expect_find_active_endpoint().returning(|id| {
            Ok(Some(EndpointRecord {
                identifier: id.clone(),
                url: "https://p/v2".into(),
                is_active: true,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }))
        });

        let resolver = Resolver::new(
            Arc::new(cache),
            Arc::new(record_store),
            resilience("cache", OperationClass::Read),
            resilience("record_store", OperationClass::Read),
            Arc::new(Drainer::new()),
            Arc::new(Bulkhead::new(4, 4, 4)),
            Arc::new(DefaultClock),
            ResolverConfig::default(),
        );

        let url = resolver.resolve(&identifier()).await.expect("resolved");
        assert_eq!(url, "https://p/v2");
    }

    #[tokio::test]
    async fn store_miss_writes_negative_entry_and_surfaces_not_found() {
        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_put_not_found().returning(|_, _| Ok(()));

        let mut record_store = MockRecordStore::new();
        record_store
            .expect_find_active_endpoint()
            .returning(|_| Ok(None));

        let resolver = Resolver::new(
            Arc::new(cache),
            Arc::new(record_store),
            resilience("cache", OperationClass::Read),
            resilience("record_store", OperationClass::Read),
            Arc::new(Drainer::new()),
            Arc::new(Bulkhead::new(4, 4, 4)),
            Arc::new(DefaultClock),
            ResolverConfig::default(),
        );

        let err = resolver.resolve(&identifier()).await.expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn record_store_outage_surfaces_unavailable() {
        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| Ok(None));

        let mut record_store = MockRecordStore::new();
        record_store
            .expect_find_active_endpoint()
            .returning(|_| Err(RecordStoreError::fatal("connection refused")));

        let resolver = Resolver::new(
            Arc::new(cache),
            Arc::new(record_store),
            resilience("cache", OperationClass::Read),
            resilience("record_store", OperationClass::Read),
            Arc::new(Drainer::new()),
            Arc::new(Bulkhead::new(4, 4, 4)),
            Arc::new(DefaultClock),
            ResolverConfig::default(),
        );

        let err = resolver
            .resolve(&identifier())
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
