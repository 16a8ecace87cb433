use std::any::Any;

use api_errors::ApiError;
use axum::response::{IntoResponse, Response};

/// Turns a handler panic into a generic 500 Problem. The payload is logged only.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_to_problem(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    ApiError::Unexpected(anyhow::anyhow!("handler panicked: {message}")).into_response()
}
