//! REST error mapping for the calculator module.

use api_errors::{ApiError, Problem, ValidationViolation};
use axum::extract::rejection::JsonRejection;

use crate::domain::error::DomainError;

/// Resource name used in not-found details.
const RESOURCE: &str = "Calculation";

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(id) => ApiError::not_found(RESOURCE, id),
            DomainError::InvalidOperator(symbol) => ApiError::invalid_request(
                format!("Unsupported operator '{symbol}'"),
                vec![ValidationViolation::new(
                    "body.operator",
                    "must be one of +, -, *, /",
                )],
            ),
            DomainError::Internal(err) => ApiError::Unexpected(err),
        }
    }
}

/// Map a domain error to a Problem bound to the request path.
pub fn domain_error_to_problem(e: DomainError, instance: &str) -> Problem {
    ApiError::from(e).into_problem(instance)
}

/// Map a body extraction failure (bad JSON, wrong content type) to a 400 Problem.
pub fn json_rejection_to_problem(rejection: &JsonRejection, instance: &str) -> Problem {
    ApiError::invalid_request(
        "Request body could not be parsed",
        vec![ValidationViolation::new("body", rejection.body_text())],
    )
    .into_problem(instance)
}
