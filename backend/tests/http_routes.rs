//! HTTP-level integration tests for the five boundary operations, wired
//! through the real domain services and resilience kernel but backed by
//! hand-rolled recording doubles instead of live adapters.

mod support;

use std::sync::Arc;

use actix_web::{test, web, App};
use mockable::DefaultClock;

use backend::domain::ports::{CreateOutcome, EndpointRecord, RecordStoreError, ToggleOutcome};
use backend::domain::RouteIdentifier;
use backend::inbound::http::correlation::Correlation;
use backend::inbound::http::routes::{
    activate_route, audit_query, create_route, deactivate_route, resolve_route,
};
use backend::inbound::http::state::HttpState;
use backend::server::{build_domain_services, AppConfig, ResilienceHandles};

use support::doubles::{RecordingAuditStore, RecordingCache, RecordingEventLog, RecordingRecordStore};

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused/unused".to_owned(),
        redis_url: "redis://unused".to_owned(),
        kafka_bootstrap_servers: "unused:9092".to_owned(),
        bind_addr: "127.0.0.1:0".parse().expect("valid socket addr"),
        db_pool_max_size: 1,
        redis_pool_max_size: 1,
        bulkhead_read_capacity: 8,
        bulkhead_write_capacity: 8,
        bulkhead_audit_capacity: 8,
        drain_timeout: std::time::Duration::from_secs(1),
    }
}

struct Doubles {
    cache: Arc<RecordingCache>,
    record_store: Arc<RecordingRecordStore>,
    event_log: Arc<RecordingEventLog>,
    audit_store: Arc<RecordingAuditStore>,
}

fn build_http_state(doubles: &Doubles) -> web::Data<HttpState> {
    let config = test_config();
    let resilience = ResilienceHandles::new(&config, &DefaultClock);
    let (resolver, mutator, audit_query) = build_domain_services(
        Arc::clone(&doubles.cache) as Arc<dyn backend::domain::ports::Cache>,
        Arc::clone(&doubles.record_store) as Arc<dyn backend::domain::ports::RecordStore>,
        Arc::clone(&doubles.event_log) as Arc<dyn backend::domain::ports::EventLog>,
        Arc::clone(&doubles.audit_store) as Arc<dyn backend::domain::ports::AuditStore>,
        &resilience,
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(resolver, mutator, audit_query))
}

fn sample_record(identifier: &RouteIdentifier, url: &str) -> EndpointRecord {
    EndpointRecord {
        identifier: identifier.clone(),
        url: url.to_owned(),
        is_active: true,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

#[actix_web::test]
async fn resolve_route_returns_url_on_cache_miss_fallthrough() {
    let identifier =
        RouteIdentifier::new("team-a", "payments", "prod", "v2").expect("valid identifier");
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles
        .record_store
        .set_find_response(Ok(Some(sample_record(&identifier, "https://payments.example/v2"))));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(resolve_route),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/routes/team-a/payments/prod/v2")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());
    assert!(res.headers().contains_key("correlation-id"));

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["url"], "https://payments.example/v2");
}

#[actix_web::test]
async fn resolve_route_returns_404_when_absent() {
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles.record_store.set_find_response(Ok(None));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(resolve_route),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/routes/team-a/payments/prod/v2")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_route_returns_201_and_echoes_supplied_correlation_id() {
    let identifier =
        RouteIdentifier::new("team-a", "payments", "prod", "v2").expect("valid identifier");
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles.record_store.set_create_response(Ok(CreateOutcome::Created(sample_record(
        &identifier,
        "https://payments.example/v2",
    ))));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(create_route),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/routes/team-a/payments/prod/v2")
        .insert_header(("correlation-id", "caller-supplied"))
        .set_json(serde_json::json!({"url": "https://payments.example/v2", "changed_by": "alice"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    assert_eq!(
        res.headers().get("correlation-id").expect("header present"),
        "caller-supplied"
    );

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["created"], true);

    let published = doubles.event_log.published.lock().expect("lock");
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].changed_by.as_deref(), Some("alice"));
}

#[actix_web::test]
async fn create_route_returns_409_on_conflict() {
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles.record_store.set_create_response(Ok(CreateOutcome::Conflict {
        existing_url: "https://payments.example/v1".to_owned(),
    }));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(create_route),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/routes/team-a/payments/prod/v2")
        .set_json(serde_json::json!({"url": "https://payments.example/v2"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CONFLICT);
}

#[actix_web::test]
async fn activate_route_returns_404_when_no_endpoint_exists() {
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles.record_store.set_toggle_response(Ok(ToggleOutcome::NotFound));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(activate_route),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/routes/team-a/payments/prod/v2/activate")
        .set_json(serde_json::json!({}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn deactivate_route_reports_already_inactive_without_changed_flag() {
    let identifier =
        RouteIdentifier::new("team-a", "payments", "prod", "v2").expect("valid identifier");
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles.record_store.set_toggle_response(Ok(ToggleOutcome::AlreadyInState(
        sample_record(&identifier, "https://payments.example/v2"),
    )));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(deactivate_route),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/routes/team-a/payments/prod/v2/deactivate")
        .set_json(serde_json::json!({}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["active"], false);
    assert_eq!(body["changed"], false);
}

#[actix_web::test]
async fn create_route_surfaces_service_unavailable_as_503() {
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    doubles
        .record_store
        .set_create_response(Err(RecordStoreError::connection("pool exhausted")));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(create_route),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/routes/team-a/payments/prod/v2")
        .set_json(serde_json::json!({"url": "https://payments.example/v2"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn audit_query_returns_matching_documents() {
    let doubles = Doubles {
        cache: Arc::new(RecordingCache::default()),
        record_store: Arc::new(RecordingRecordStore::default()),
        event_log: Arc::new(RecordingEventLog::default()),
        audit_store: Arc::new(RecordingAuditStore::default()),
    };
    let document = backend::domain::audit::AuditDocument {
        event_id: uuid::Uuid::new_v4(),
        action: backend::domain::route_event::RouteAction::Created,
        tenant: "team-a".to_owned(),
        service: "payments".to_owned(),
        env: "prod".to_owned(),
        version: "v2".to_owned(),
        url: "https://payments.example/v2".to_owned(),
        previous_url: None,
        previous_state: None,
        changed_by: None,
        occurred_at: chrono::Utc::now(),
        processed_at: chrono::Utc::now(),
        correlation_id: "corr-1".to_owned(),
        metadata: serde_json::json!({}),
    };
    doubles.audit_store.set_query_response(Ok(vec![document]));

    let http_state = build_http_state(&doubles);
    let app = test::init_service(
        App::new()
            .app_data(http_state)
            .wrap(Correlation)
            .service(audit_query),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/audit?tenant=team-a")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());

    let body: Vec<serde_json::Value> = test::read_body_json(res).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["tenant"], "team-a");
}
