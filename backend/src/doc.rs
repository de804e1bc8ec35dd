//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP path and response schema exposed by the
//! [`crate::inbound::http`] adapter. Consumed by Swagger UI (debug builds)
//! and exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::dto::{
    AdapterStatus, AuditDocumentResponse, CreateRouteRequest, CreateRouteResponse,
    LivenessResponse, ReadinessResponse, ResolveRouteResponse, ToggleRouteRequest,
    ToggleRouteResponse,
};

/// OpenAPI document for the routing control plane's REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Route registry API",
        description = "HTTP interface for resolving, mutating, and auditing versioned service routes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::routes::resolve_route,
        crate::inbound::http::routes::create_route,
        crate::inbound::http::routes::activate_route,
        crate::inbound::http::routes::deactivate_route,
        crate::inbound::http::routes::audit_query,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ResolveRouteResponse,
        CreateRouteRequest,
        CreateRouteResponse,
        ToggleRouteRequest,
        ToggleRouteResponse,
        AuditDocumentResponse,
        ReadinessResponse,
        AdapterStatus,
        LivenessResponse,
    )),
    tags(
        (name = "routes", description = "Operations related to routes"),
        (name = "audit", description = "Operations related to the audit trail"),
        (name = "health", description = "Endpoints for health checks"),
    )
)]
pub struct ApiDoc;
