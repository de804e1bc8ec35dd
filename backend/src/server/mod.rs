//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, ConfigEnv, DefaultConfigEnv};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::doc::ApiDoc;
use crate::domain::resilience::{AdapterResilience, Bulkhead, Drainer};
use crate::domain::{AuditQuery, Mutator, Resolver};
use crate::inbound::http::correlation::Correlation;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::routes::{
    activate_route, audit_query, create_route, deactivate_route, resolve_route,
};
use crate::inbound::http::state::HttpState;

/// Dependencies the Actix app factory closure needs on every worker thread.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("")
        .service(resolve_route)
        .service(create_route)
        .service(activate_route)
        .service(deactivate_route)
        .service(audit_query);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Correlation)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server bound to `config.bind_addr`.
///
/// Marks `health_state` ready once bound, matching the teacher's
/// bind-then-mark-ready ordering so readiness never precedes listener setup.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    bind_addr: std::net::SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Build the three [`AdapterResilience`] instances shared by the domain
/// services, one per adapter, drawing from the same process-wide bulkhead
/// and drainer (`spec.md` §4.5).
pub struct ResilienceHandles {
    pub drainer: Arc<Drainer>,
    pub bulkhead: Arc<Bulkhead>,
    pub cache: Arc<AdapterResilience>,
    pub record_store: Arc<AdapterResilience>,
    pub event_log: Arc<AdapterResilience>,
    pub audit_store: Arc<AdapterResilience>,
}

impl ResilienceHandles {
    pub fn new(config: &AppConfig, clock: &impl mockable::Clock) -> Self {
        use crate::domain::resilience::{CircuitBreakerConfig, OperationClass, RetryBudgetConfig};

        let drainer = Arc::new(Drainer::new());
        let bulkhead = Arc::new(Bulkhead::new(
            config.bulkhead_read_capacity,
            config.bulkhead_write_capacity,
            config.bulkhead_audit_capacity,
        ));
        let cache = Arc::new(AdapterResilience::new(
            "cache",
            OperationClass::Read,
            CircuitBreakerConfig::CACHE,
            RetryBudgetConfig::DEFAULT,
            clock,
        ));
        let record_store = Arc::new(AdapterResilience::new(
            "record_store",
            OperationClass::Write,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            clock,
        ));
        let event_log = Arc::new(AdapterResilience::new(
            "event_log",
            OperationClass::Write,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            clock,
        ));
        let audit_store = Arc::new(AdapterResilience::new(
            "audit_store",
            OperationClass::Audit,
            CircuitBreakerConfig::DEFAULT,
            RetryBudgetConfig::DEFAULT,
            clock,
        ));

        Self {
            drainer,
            bulkhead,
            cache,
            record_store,
            event_log,
            audit_store,
        }
    }

    pub fn breakers(&self) -> Vec<Arc<AdapterResilience>> {
        vec![
            Arc::clone(&self.cache),
            Arc::clone(&self.record_store),
            Arc::clone(&self.event_log),
            Arc::clone(&self.audit_store),
        ]
    }
}

/// Build the domain services from already-constructed adapters and
/// resilience handles.
#[allow(clippy::too_many_arguments, reason = "explicit bootstrap wiring, no builder needed at this call count")]
pub fn build_domain_services(
    cache: Arc<dyn crate::domain::ports::Cache>,
    record_store: Arc<dyn crate::domain::ports::RecordStore>,
    event_log: Arc<dyn crate::domain::ports::EventLog>,
    audit_store: Arc<dyn crate::domain::ports::AuditStore>,
    resilience: &ResilienceHandles,
    clock: Arc<dyn mockable::Clock>,
) -> (Arc<Resolver>, Arc<Mutator>, Arc<AuditQuery>) {
    let resolver = Arc::new(Resolver::new(
        Arc::clone(&cache),
        Arc::clone(&record_store),
        Arc::clone(&resilience.cache),
        Arc::clone(&resilience.record_store),
        Arc::clone(&resilience.drainer),
        Arc::clone(&resilience.bulkhead),
        Arc::clone(&clock),
        crate::domain::ResolverConfig::default(),
    ));
    let mutator = Arc::new(Mutator::new(
        Arc::clone(&record_store),
        Arc::clone(&event_log),
        Arc::clone(&resilience.record_store),
        Arc::clone(&resilience.event_log),
        Arc::clone(&resilience.drainer),
        Arc::clone(&resilience.bulkhead),
        Arc::clone(&clock),
    ));
    let audit_query = Arc::new(AuditQuery::new(
        audit_store,
        Arc::clone(&resilience.audit_store),
        Arc::clone(&resilience.drainer),
        Arc::clone(&resilience.bulkhead),
        clock,
    ));

    (resolver, mutator, audit_query)
}
