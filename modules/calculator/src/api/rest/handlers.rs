//! REST handlers for the calculator module.

use std::sync::Arc;

use api_errors::Problem;
use api_gateway::RequestTimestamp;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, OriginalUri, Path};
use axum::http::StatusCode;

use super::dto::{CalculationCommandDto, CalculationDto};
use super::error::{domain_error_to_problem, json_rejection_to_problem};
use crate::domain::model::CalculationCommand;
use crate::domain::service::CalculatorService;

pub type CalculatorResult<T> = Result<T, Problem>;

fn parse_command(
    payload: Result<Json<CalculationCommandDto>, JsonRejection>,
    instance: &str,
) -> CalculatorResult<CalculationCommand> {
    let Json(dto) = payload.map_err(|rejection| json_rejection_to_problem(&rejection, instance))?;
    CalculationCommand::try_from(dto).map_err(|e| domain_error_to_problem(e, instance))
}

/// GET /calculator
///
/// All calculations in insertion order.
#[utoipa::path(
    get,
    path = "/calculator",
    tag = "calculator",
    operation_id = "list_calculations",
    responses(
        (status = 200, description = "All calculations", body = [CalculationDto]),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_calculations(
    Extension(service): Extension<Arc<CalculatorService>>,
    OriginalUri(uri): OriginalUri,
) -> CalculatorResult<Json<Vec<CalculationDto>>> {
    let records = service
        .list()
        .map_err(|e| domain_error_to_problem(e, uri.path()))?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// GET /calculator/{id}
///
/// The matching calculation wrapped in a single-element array.
#[utoipa::path(
    get,
    path = "/calculator/{id}",
    tag = "calculator",
    operation_id = "get_calculation",
    params(("id" = String, Path, description = "Calculation id")),
    responses(
        (status = 200, description = "Single-element array holding the calculation", body = [CalculationDto]),
        (status = 404, description = "No calculation with this id", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_calculation(
    Extension(service): Extension<Arc<CalculatorService>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> CalculatorResult<Json<Vec<CalculationDto>>> {
    let record = service
        .get(&id)
        .map_err(|e| domain_error_to_problem(e, uri.path()))?;
    Ok(Json(vec![record.into()]))
}

/// POST /calculator
///
/// Evaluate a command and store the result.
#[utoipa::path(
    post,
    path = "/calculator",
    tag = "calculator",
    operation_id = "create_calculation",
    request_body(content = CalculationCommandDto, description = "Operator and operands", content_type = "application/json"),
    responses(
        (status = 201, description = "Created calculation", body = CalculationDto),
        (status = 400, description = "Request does not match the contract", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_calculation(
    Extension(service): Extension<Arc<CalculatorService>>,
    Extension(RequestTimestamp(timestamp)): Extension<RequestTimestamp>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CalculationCommandDto>, JsonRejection>,
) -> CalculatorResult<(StatusCode, Json<CalculationDto>)> {
    let command = parse_command(payload, uri.path())?;
    let record = service
        .create(command, timestamp)
        .map_err(|e| domain_error_to_problem(e, uri.path()))?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// PUT /calculator/{id}
///
/// Re-evaluate and replace an existing calculation, keeping its id.
#[utoipa::path(
    put,
    path = "/calculator/{id}",
    tag = "calculator",
    operation_id = "update_calculation",
    params(("id" = String, Path, description = "Calculation id")),
    request_body(content = CalculationCommandDto, description = "Operator and operands", content_type = "application/json"),
    responses(
        (status = 200, description = "Updated calculation", body = CalculationDto),
        (status = 400, description = "Request does not match the contract", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "No calculation with this id", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_calculation(
    Extension(service): Extension<Arc<CalculatorService>>,
    Extension(RequestTimestamp(timestamp)): Extension<RequestTimestamp>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    payload: Result<Json<CalculationCommandDto>, JsonRejection>,
) -> CalculatorResult<Json<CalculationDto>> {
    let command = parse_command(payload, uri.path())?;
    let record = service
        .update(&id, command, timestamp)
        .map_err(|e| domain_error_to_problem(e, uri.path()))?;
    Ok(Json(record.into()))
}

/// DELETE /calculator/{id}
#[utoipa::path(
    delete,
    path = "/calculator/{id}",
    tag = "calculator",
    operation_id = "delete_calculation",
    params(("id" = String, Path, description = "Calculation id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No calculation with this id", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_calculation(
    Extension(service): Extension<Arc<CalculatorService>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> CalculatorResult<StatusCode> {
    service
        .delete(&id)
        .map_err(|e| domain_error_to_problem(e, uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}
