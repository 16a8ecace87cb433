//! API error taxonomy and its translation into Problem Details.
//!
//! Handlers and middleware raise `ApiError`; the `From<ApiError> for Problem`
//! conversion below is the only place a failure becomes an HTTP status.

use thiserror::Error;

use crate::catalog;
use crate::problem::{Problem, ValidationViolation};

/// Result type for REST handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure the request pipeline can surface to a client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The request does not conform to the API contract.
    #[error("invalid request: {detail}")]
    InvalidRequest {
        detail: String,
        violations: Vec<ValidationViolation>,
    },

    /// The path is known but the method is not declared for it.
    #[error("method {method} is not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// A handler produced a response the contract does not allow.
    #[error("response violates the API contract: {0}")]
    ContractViolation(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Anything else. Details are logged, never sent to the client.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn invalid_request(
        detail: impl Into<String>,
        violations: Vec<ValidationViolation>,
    ) -> Self {
        Self::InvalidRequest {
            detail: detail.into(),
            violations,
        }
    }

    /// Translate into a Problem bound to the request path it occurred on.
    pub fn into_problem(self, instance: &str) -> Problem {
        Problem::from(self).with_instance(instance)
    }
}

impl From<ApiError> for Problem {
    fn from(e: ApiError) -> Self {
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());

        let mut problem = match e {
            ApiError::NotFound { resource, id } => {
                tracing::debug!(resource, %id, "resource not found");
                catalog::NOT_FOUND.as_problem(format!("{resource} not found for ID {id}"))
            }
            ApiError::InvalidRequest { detail, violations } => {
                tracing::debug!(%detail, violations = violations.len(), "request rejected");
                let problem = catalog::INVALID_REQUEST.as_problem(detail);
                if violations.is_empty() {
                    problem
                } else {
                    problem.with_errors(violations)
                }
            }
            ApiError::MethodNotAllowed { method, path } => catalog::METHOD_NOT_ALLOWED
                .as_problem(format!("Method {method} is not allowed on {path}")),
            ApiError::ContractViolation(detail) => {
                tracing::error!(%detail, "handler response violates the API contract");
                catalog::CONTRACT_VIOLATION.as_problem("The server produced an invalid response")
            }
            ApiError::Timeout => {
                catalog::TIMEOUT.as_problem("The request did not complete in time")
            }
            ApiError::Unexpected(err) => {
                tracing::error!(error = ?err, "unexpected error while handling request");
                catalog::INTERNAL.as_problem("An internal error occurred")
            }
        };

        if let Some(id) = trace_id {
            problem = problem.with_trace_id(id);
        }
        problem
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        Problem::from(self).into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn not_found_maps_to_404_and_names_the_id() {
        let problem: Problem = ApiError::not_found("Calculation", "999").into();
        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        assert_eq!(problem.code, "NOT_FOUND");
        assert!(problem.detail.contains("999"));
    }

    #[test]
    fn invalid_request_carries_violations() {
        let err = ApiError::invalid_request(
            "Request body does not match the contract",
            vec![ValidationViolation::new("body.operand1", "not a number")],
        );
        let problem = err.into_problem("/calculator");
        assert_eq!(problem.status, StatusCode::BAD_REQUEST);
        assert_eq!(problem.instance, "/calculator");
        let errors = problem.errors.unwrap();
        assert_eq!(errors[0].field, "body.operand1");
    }

    #[test]
    fn invalid_request_without_violations_omits_errors() {
        let problem: Problem = ApiError::invalid_request("bad", vec![]).into();
        assert!(problem.errors.is_none());
    }

    #[test]
    fn method_not_allowed_maps_to_405() {
        let problem: Problem = ApiError::MethodNotAllowed {
            method: "PATCH".to_owned(),
            path: "/calculator/1".to_owned(),
        }
        .into();
        assert_eq!(problem.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn contract_violation_does_not_leak_detail() {
        let problem: Problem =
            ApiError::ContractViolation("body.result: \"x\" is not a number".to_owned()).into();
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.code, "CONTRACT_VIOLATION");
        assert!(!problem.detail.contains("body.result"));
    }

    #[test]
    fn unexpected_is_generic_500() {
        let problem: Problem = ApiError::from(anyhow::anyhow!("lock poisoned")).into();
        assert_eq!(problem.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(problem.code, "INTERNAL");
        assert!(!problem.detail.contains("poisoned"));
    }

    #[test]
    fn timeout_maps_to_504() {
        let problem: Problem = ApiError::Timeout.into();
        assert_eq!(problem.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn into_response_sets_problem_content_type() {
        use axum::response::IntoResponse;

        let resp = ApiError::not_found("Calculation", "7").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let ct = resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, crate::APPLICATION_PROBLEM_JSON);
    }
}
