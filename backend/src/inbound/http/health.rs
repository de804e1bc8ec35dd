//! Health endpoints: liveness & readiness probes for orchestration and load
//! balancers, extended beyond a bare up/down flag with the drainer state and
//! each adapter's circuit breaker state (`SPEC_FULL.md` §10).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::{get, http::header, web, HttpResponse};

use crate::domain::resilience::{AdapterResilience, Drainer};

use super::dto::{AdapterStatus, LivenessResponse, ReadinessResponse};

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    drainer: Arc<Drainer>,
    adapters: Vec<Arc<AdapterResilience>>,
}

impl HealthState {
    pub fn new(drainer: Arc<Drainer>, adapters: Vec<Arc<AdapterResilience>>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            drainer,
            adapters,
        }
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Ready means: marked ready, not draining, and every adapter breaker closed.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
            && !self.drainer.is_draining()
            && self
                .adapters
                .iter()
                .all(|adapter| adapter.breaker_state() == crate::domain::resilience::CircuitBreakerState::Closed)
    }

    fn adapter_statuses(&self) -> Vec<AdapterStatus> {
        self.adapters
            .iter()
            .map(|adapter| AdapterStatus {
                name: adapter.name().to_string(),
                circuit_breaker: format!("{:?}", adapter.breaker_state()),
            })
            .collect()
    }

}

/// Readiness probe: 200 once dependencies are initialised, the process isn't
/// draining, and every adapter breaker is closed; 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ReadinessResponse),
        (status = 503, description = "Server is not ready", body = ReadinessResponse),
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ready = state.is_ready();
    let body = ReadinessResponse {
        ready,
        adapters: state.adapter_statuses(),
    };
    if ready {
        HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(body)
    } else {
        HttpResponse::ServiceUnavailable()
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(body)
    }
}

/// Liveness probe. 200 while the process is marked alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = LivenessResponse),
        (status = 503, description = "Server is shutting down", body = LivenessResponse),
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    let alive = state.is_alive();
    let body = LivenessResponse { alive };
    let mut response = if alive {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(body)
}
