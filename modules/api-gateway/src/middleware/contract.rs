//! Request and response validation against the API contract.
//!
//! Requests to declared operations are buffered and checked before routing;
//! handler responses are buffered and checked before they leave the gateway.
//! Paths the contract does not declare pass through untouched. `HEAD` is
//! validated as the path's `GET`, with only the response status checked.

use std::sync::Arc;

use api_contract::{Contract, Lookup, Operation, RequestParts, ResponseParts};
use api_errors::{ApiError, ValidationViolation};
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::config::ApiGatewayConfig;

/// Shared state of the validation middleware.
#[derive(Clone)]
pub struct ContractValidation {
    contract: Arc<Contract>,
    config: Arc<ApiGatewayConfig>,
}

impl ContractValidation {
    #[must_use]
    pub fn new(contract: Arc<Contract>, config: Arc<ApiGatewayConfig>) -> Self {
        Self { contract, config }
    }
}

fn header_str(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub async fn validate_contract(
    State(state): State<ContractValidation>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if state.config.is_exempt(&path) {
        return next.run(req).await;
    }

    let method = req.method().as_str().to_owned();
    let bodiless = req.method() == Method::HEAD;
    let (operation, path_params) = match state.contract.lookup(&method, &path) {
        Lookup::NotDeclared => return next.run(req).await,
        Lookup::MethodNotAllowed { allowed } => {
            debug!(%method, %path, "method not declared for path");
            let mut response = ApiError::MethodNotAllowed {
                method,
                path: path.clone(),
            }
            .into_problem(&path)
            .into_response();
            if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                response.headers_mut().insert(ALLOW, value);
            }
            return response;
        }
        Lookup::Found {
            operation,
            path_params,
        } => (operation, path_params),
    };

    let req = if state.config.validate_requests {
        match check_request(operation, &path_params, req).await {
            Ok(req) => req,
            Err(e) => return e.into_problem(&path).into_response(),
        }
    } else {
        req
    };

    let response = next.run(req).await;

    if !state.config.validate_responses {
        return response;
    }
    if bodiless {
        check_status(operation, &path, response)
    } else {
        check_response(operation, &path, response).await
    }
}

async fn check_request(
    operation: &Operation,
    path_params: &[(String, String)],
    req: Request,
) -> Result<Request, ApiError> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| {
            ApiError::invalid_request(
                "Request body could not be read",
                vec![ValidationViolation::new("body", e.to_string())],
            )
        })?;

    {
        let headers: Vec<(&str, &str)> = parts
            .headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
            .collect();
        let request = RequestParts {
            path_params,
            query: parts.uri.query(),
            headers: &headers,
            content_type: header_str(&parts.headers, CONTENT_TYPE),
            body: &bytes,
        };
        operation.validate_request(&request).map_err(|violations| {
            ApiError::invalid_request("Request does not match the API contract", violations)
        })?;
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

async fn check_response(operation: &Operation, path: &str, response: Response) -> Response {
    let (parts, body) = response.into_parts();
    let bytes: Bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, %path, "failed to buffer response body");
            return ApiError::Unexpected(anyhow::anyhow!("response body unreadable: {e}"))
                .into_problem(path)
                .into_response();
        }
    };

    let outcome = operation.validate_response(&ResponseParts {
        status: parts.status.as_u16(),
        content_type: header_str(&parts.headers, CONTENT_TYPE),
        body: &bytes,
    });

    match outcome {
        Ok(()) => Response::from_parts(parts, Body::from(bytes)),
        Err(violations) => contract_violation(operation, path, parts.status, &violations),
    }
}

/// `HEAD` replies carry no body, so only the status is checked.
fn check_status(operation: &Operation, path: &str, response: Response) -> Response {
    match operation.validate_status(response.status().as_u16()) {
        Ok(()) => response,
        Err(violations) => contract_violation(operation, path, response.status(), &violations),
    }
}

fn contract_violation(
    operation: &Operation,
    path: &str,
    status: StatusCode,
    violations: &[ValidationViolation],
) -> Response {
    let detail = violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ");
    ApiError::ContractViolation(format!(
        "{} {} -> {}: {detail}",
        operation.method(),
        operation.path(),
        status.as_u16()
    ))
    .into_problem(path)
    .into_response()
}
