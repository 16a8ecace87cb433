#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for api-gateway integration tests

use std::sync::Arc;
use std::time::Duration;

use api_errors::Problem;
use api_gateway::{ApiGateway, ApiGatewayConfig, RequestTimestamp, RestModule};
use axum::body::Body;
use axum::extract::Extension;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Widget {
    pub name: String,
    pub size: i64,
}

#[utoipa::path(
    post,
    path = "/widgets",
    request_body = Widget,
    responses(
        (status = 201, description = "created", body = Widget),
        (status = 400, description = "bad request", body = Problem, content_type = "application/problem+json"),
    )
)]
async fn create_widget(
    Extension(RequestTimestamp(ts)): Extension<RequestTimestamp>,
    Json(widget): Json<Widget>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "name": widget.name, "size": widget.size, "stamped": ts })),
    )
}

#[utoipa::path(get, path = "/widgets/broken", responses((status = 200, description = "ok", body = Widget)))]
async fn broken_widget() -> Json<Value> {
    Json(json!({ "name": 5 }))
}

#[utoipa::path(get, path = "/widgets/teapot", responses((status = 200, description = "ok", body = Widget)))]
async fn teapot() -> StatusCode {
    StatusCode::IM_A_TEAPOT
}

#[utoipa::path(get, path = "/widgets/slow", responses((status = 200, description = "ok")))]
async fn slow() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(5)).await;
    StatusCode::OK
}

#[utoipa::path(get, path = "/widgets/panic", responses((status = 200, description = "ok")))]
async fn explode() -> StatusCode {
    panic!("widget exploded")
}

async fn undocumented() -> &'static str {
    "not in the contract"
}

#[derive(OpenApi)]
#[openapi(
    paths(create_widget, broken_widget, teapot, slow, explode),
    components(schemas(Widget))
)]
struct WidgetApi;

pub struct WidgetModule;

impl RestModule for WidgetModule {
    fn name(&self) -> &'static str {
        "widgets"
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/widgets", post(create_widget))
            .route("/widgets/broken", get(broken_widget))
            .route("/widgets/teapot", get(teapot))
            .route("/widgets/slow", get(slow))
            .route("/widgets/panic", get(explode))
            .route("/undocumented", get(undocumented))
    }

    fn openapi(&self) -> utoipa::openapi::OpenApi {
        WidgetApi::openapi()
    }
}

pub fn gateway(config: ApiGatewayConfig) -> ApiGateway {
    ApiGateway::new(config).with_module(Arc::new(WidgetModule))
}

pub fn router() -> Router {
    gateway(ApiGatewayConfig::default()).build_router().unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn head_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("HEAD")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}
