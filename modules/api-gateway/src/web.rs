//! Gateway-owned endpoints: health, contract document, fallbacks.

use std::sync::Arc;

use api_errors::{ApiError, Problem, ValidationViolation, catalog};
use axum::Json;
use axum::extract::{Extension, OriginalUri};
use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{OpenApi, ToSchema};

use crate::middleware::timestamp::RequestTimestamp;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
    /// Milliseconds since the Unix epoch at which the request was received.
    pub timestamp: i64,
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    operation_id = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(
    Extension(RequestTimestamp(timestamp)): Extension<RequestTimestamp>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "OK".to_owned(),
        timestamp,
    })
}

/// Root of the generated document; REST modules merge their fragments into it.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calculator API",
        version = "1.0.0",
        description = "Arithmetic calculations over an in-memory store"
    ),
    paths(health_check),
    components(schemas(HealthResponse, Problem, ValidationViolation)),
    tags((name = "health", description = "Liveness"))
)]
pub struct GatewayApi;

/// The serialized contract document, shared by the `/openapi.json` route.
#[derive(Clone)]
pub struct ContractDocument(pub Arc<Value>);

/// GET /openapi.json
pub async fn openapi_document(
    Extension(ContractDocument(doc)): Extension<ContractDocument>,
) -> Json<Value> {
    Json(doc.as_ref().clone())
}

/// Fallback for paths no route serves.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> Problem {
    let path = uri.path();
    tracing::debug!(%path, "no route matched");
    catalog::NOT_FOUND
        .as_problem(format!("No resource at {path}"))
        .with_instance(path)
}

/// Fallback for routed paths without a handler for the method.
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> Problem {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_owned(),
    }
    .into_problem(uri.path())
}
