#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! Backend entry-point: wires the HTTP inbound adapter, the three
//! `route-events` consumers, and the Postgres/Redis/Kafka outbound adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::ports::{AuditStore, Cache, EventLog, RecordStore};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::cache::RedisCache;
use backend::outbound::event_log::consumers::{
    run_consumer, AuditWriter, CacheInvalidator, CacheWarmer, EventHandler,
};
use backend::outbound::event_log::KafkaEventLog;
use backend::outbound::persistence::{DbPool, DieselAuditStore, DieselRecordStore, PoolConfig};
use backend::server::{build_domain_services, create_server, AppConfig, ResilienceHandles};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let db_pool = DbPool::new(
        PoolConfig::new(config.database_url.clone()).with_max_size(config.db_pool_max_size),
    )
    .await
    .map_err(|err| std::io::Error::other(format!("failed to build database pool: {err}")))?;

    let cache: Arc<dyn Cache> = Arc::new(
        RedisCache::new(&config.redis_url, config.redis_pool_max_size)
            .await
            .map_err(|err| std::io::Error::other(format!("failed to build redis pool: {err}")))?,
    );
    let record_store: Arc<dyn RecordStore> = Arc::new(DieselRecordStore::new(db_pool.clone()));
    let audit_store: Arc<dyn AuditStore> = Arc::new(DieselAuditStore::new(db_pool.clone()));
    let event_log: Arc<dyn EventLog> = Arc::new(
        KafkaEventLog::new(&config.kafka_bootstrap_servers)
            .map_err(|err| std::io::Error::other(format!("failed to build kafka producer: {err}")))?,
    );

    let resilience = ResilienceHandles::new(&config, &DefaultClock);
    let health_state = actix_web::web::Data::new(HealthState::new(
        Arc::clone(&resilience.drainer),
        resilience.breakers(),
    ));

    let (resolver, mutator, audit_query) = build_domain_services(
        Arc::clone(&cache),
        Arc::clone(&record_store),
        Arc::clone(&event_log),
        Arc::clone(&audit_store),
        &resilience,
        Arc::clone(&clock),
    );
    let http_state = actix_web::web::Data::new(HttpState::new(resolver, mutator, audit_query));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let consumer_handlers: Vec<Arc<dyn EventHandler>> = vec![
        Arc::new(CacheInvalidator::new(Arc::clone(&cache))),
        Arc::new(CacheWarmer::new(Arc::clone(&cache))),
        Arc::new(AuditWriter::new(Arc::clone(&audit_store), Arc::clone(&clock))),
    ];
    let mut consumer_tasks = Vec::new();
    for handler in consumer_handlers {
        let bootstrap_servers = config.kafka_bootstrap_servers.clone();
        let shutdown_rx = shutdown_rx.clone();
        consumer_tasks.push(tokio::spawn(async move {
            if let Err(err) = run_consumer(&bootstrap_servers, handler, shutdown_rx).await {
                warn!(%err, "consumer exited with error");
            }
        }));
    }

    let server = create_server(health_state.clone(), http_state, config.bind_addr)?;
    let server_handle = server.handle();

    let drainer = Arc::clone(&resilience.drainer);
    let drain_timeout = config.drain_timeout;
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        warn!("shutdown signal received; draining in-flight requests");
        health_state.mark_unhealthy();
        drainer.start_draining();
        drainer.wait_for_drain(drain_timeout).await;
        let _ = shutdown_tx.send(true);
        server_handle.stop(true).await;
    });

    server.await?;
    for task in consumer_tasks {
        let _ = task.await;
    }
    Ok(())
}
