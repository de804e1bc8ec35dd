//! Handlers for the five boundary operations: `ResolveRoute`, `CreateRoute`,
//! `ActivateRoute`, `DeactivateRoute`, `AuditQuery`.

use actix_web::{get, post, web, HttpMessage, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};

use crate::domain::audit::AuditQueryFilter;
use crate::domain::route_event::RouteAction;
use crate::domain::{CorrelationId, Error, RouteIdentifier};

use super::dto::{
    AuditDocumentResponse, AuditQueryParams, CreateRouteRequest, CreateRouteResponse,
    ResolveRouteResponse, RoutePath, ToggleRouteRequest, ToggleRouteResponse,
};
use super::error::ApiResult;
use super::state::HttpState;

fn correlation_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<CorrelationId>()
        .map(CorrelationId::to_string)
        .unwrap_or_else(|| CorrelationId::generate().to_string())
}

fn identifier(path: &RoutePath) -> Result<RouteIdentifier, Error> {
    RouteIdentifier::new(&path.tenant, &path.service, &path.env, &path.version)
}

#[utoipa::path(
    get,
    path = "/routes/{tenant}/{service}/{env}/{version}",
    tags = ["routes"],
    params(
        ("tenant" = String, Path, description = "Tenant identifier"),
        ("service" = String, Path, description = "Service name"),
        ("env" = String, Path, description = "Environment name"),
        ("version" = String, Path, description = "Service version"),
    ),
    responses(
        (status = 200, description = "Active endpoint found", body = ResolveRouteResponse),
        (status = 404, description = "No active endpoint for this route"),
    )
)]
#[get("/routes/{tenant}/{service}/{env}/{version}")]
pub async fn resolve_route(
    state: web::Data<HttpState>,
    path: web::Path<RoutePath>,
) -> ApiResult<HttpResponse> {
    let id = identifier(&path)?;
    let url = state.resolver.resolve(&id).await?;
    Ok(HttpResponse::Ok().json(ResolveRouteResponse { url }))
}

#[utoipa::path(
    post,
    path = "/routes/{tenant}/{service}/{env}/{version}",
    tags = ["routes"],
    params(
        ("tenant" = String, Path, description = "Tenant identifier"),
        ("service" = String, Path, description = "Service name"),
        ("env" = String, Path, description = "Environment name"),
        ("version" = String, Path, description = "Service version"),
    ),
    request_body = CreateRouteRequest,
    responses(
        (status = 201, description = "Route created or already existed", body = CreateRouteResponse),
        (status = 409, description = "An endpoint already exists with a different URL"),
    )
)]
#[post("/routes/{tenant}/{service}/{env}/{version}")]
pub async fn create_route(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<RoutePath>,
    body: web::Json<CreateRouteRequest>,
) -> ApiResult<HttpResponse> {
    let id = identifier(&path)?;
    let correlation = correlation_id(&req);
    let body = body.into_inner();
    let result = state
        .mutator
        .create(&id, &body.url, body.changed_by, &correlation)
        .await?;

    Ok(HttpResponse::Created().json(CreateRouteResponse {
        created: matches!(result, crate::domain::CreateResult::Created),
    }))
}

#[utoipa::path(
    post,
    path = "/routes/{tenant}/{service}/{env}/{version}/activate",
    tags = ["routes"],
    params(
        ("tenant" = String, Path, description = "Tenant identifier"),
        ("service" = String, Path, description = "Service name"),
        ("env" = String, Path, description = "Environment name"),
        ("version" = String, Path, description = "Service version"),
    ),
    request_body = ToggleRouteRequest,
    responses(
        (status = 200, description = "Route activated or already active", body = ToggleRouteResponse),
        (status = 404, description = "No endpoint exists for this route"),
    )
)]
#[post("/routes/{tenant}/{service}/{env}/{version}/activate")]
pub async fn activate_route(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<RoutePath>,
    body: web::Json<ToggleRouteRequest>,
) -> ApiResult<HttpResponse> {
    let id = identifier(&path)?;
    let correlation = correlation_id(&req);
    let body = body.into_inner();
    let result = state
        .mutator
        .activate(&id, body.changed_by, &correlation)
        .await?;

    Ok(HttpResponse::Ok().json(ToggleRouteResponse {
        active: true,
        changed: matches!(result, crate::domain::ToggleResult::Activated),
    }))
}

#[utoipa::path(
    post,
    path = "/routes/{tenant}/{service}/{env}/{version}/deactivate",
    tags = ["routes"],
    params(
        ("tenant" = String, Path, description = "Tenant identifier"),
        ("service" = String, Path, description = "Service name"),
        ("env" = String, Path, description = "Environment name"),
        ("version" = String, Path, description = "Service version"),
    ),
    request_body = ToggleRouteRequest,
    responses(
        (status = 200, description = "Route deactivated or already inactive", body = ToggleRouteResponse),
        (status = 404, description = "No endpoint exists for this route"),
    )
)]
#[post("/routes/{tenant}/{service}/{env}/{version}/deactivate")]
pub async fn deactivate_route(
    req: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<RoutePath>,
    body: web::Json<ToggleRouteRequest>,
) -> ApiResult<HttpResponse> {
    let id = identifier(&path)?;
    let correlation = correlation_id(&req);
    let body = body.into_inner();
    let result = state
        .mutator
        .deactivate(&id, body.changed_by, &correlation)
        .await?;

    Ok(HttpResponse::Ok().json(ToggleRouteResponse {
        active: false,
        changed: matches!(result, crate::domain::ToggleResult::Deactivated),
    }))
}

#[utoipa::path(
    get,
    path = "/audit",
    tags = ["audit"],
    params(
        ("tenant" = Option<String>, Query, description = "Filter by tenant"),
        ("service" = Option<String>, Query, description = "Filter by service"),
        ("env" = Option<String>, Query, description = "Filter by environment"),
        ("version" = Option<String>, Query, description = "Filter by service version"),
        ("action" = Option<RouteAction>, Query, description = "Filter by event action"),
        ("since" = Option<DateTime<Utc>>, Query, description = "Only events at or after this time"),
        ("until" = Option<DateTime<Utc>>, Query, description = "Only events at or before this time"),
        ("limit" = u32, Query, description = "Maximum documents to return, newest first"),
    ),
    responses(
        (status = 200, description = "Matching audit documents, newest first", body = [AuditDocumentResponse]),
    )
)]
#[get("/audit")]
pub async fn audit_query(
    state: web::Data<HttpState>,
    params: web::Query<AuditQueryParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let filter = AuditQueryFilter {
        tenant: params.tenant,
        service: params.service,
        env: params.env,
        version: params.version,
        action: params.action,
        since: params.since,
        until: params.until,
        limit: params.limit,
    };

    let documents = state.audit_query.query(&filter).await?;
    let response: Vec<AuditDocumentResponse> = documents.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}
