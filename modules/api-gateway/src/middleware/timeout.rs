use std::time::Duration;

use api_errors::ApiError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Answers with a 504 Problem once `limit` elapses.
pub async fn enforce_timeout(State(limit): State<Duration>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    if let Ok(response) = tokio::time::timeout(limit, next.run(req)).await {
        response
    } else {
        tracing::warn!(%path, timeout_ms = limit.as_millis(), "request timed out");
        ApiError::Timeout.into_problem(&path).into_response()
    }
}
