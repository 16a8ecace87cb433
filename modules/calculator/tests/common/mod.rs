#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for calculator integration tests

use std::sync::Arc;

use api_gateway::{ApiGateway, ApiGatewayConfig};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use calculator::{CalculatorConfig, CalculatorModule};
use serde_json::Value;
use tower::ServiceExt as _;

/// Full stack: gateway middleware plus a freshly seeded calculator module.
pub fn app() -> Router {
    app_with(ApiGatewayConfig::default(), &CalculatorConfig::default())
}

pub fn app_with(gateway: ApiGatewayConfig, calculator: &CalculatorConfig) -> Router {
    ApiGateway::new(gateway)
        .with_module(Arc::new(CalculatorModule::new(calculator)))
        .build_router()
        .unwrap()
}

/// Sends one request through `app` and decodes the JSON body (Null when empty).
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_owned())
        .collect()
}
